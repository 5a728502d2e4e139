pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Occurs when `zunit.toml` fails to load.
    #[error("failed to load zunit.toml: {0}")]
    LoadError(String),
    /// Occurs when a configuration value cannot be parsed.
    #[error("invalid value for \"{0}\": {1}")]
    ValueError(String, eyre::Report),
    /// Occurs when a harness is run without a suite or test to execute.
    #[error("the harness must be initialised with a suite or test")]
    Configuration,
    /// Occurs when `resolve` is given a coordinate that does not exist.
    #[error("no node at {path:?}: index {index} is out of range at depth {depth}")]
    Lookup {
        path: Vec<usize>,
        depth: usize,
        index: usize,
    },
    /// Occurs when a graph is requested before any runnable was reported.
    #[error("no result graph has been recorded")]
    EmptyGraph,
}
