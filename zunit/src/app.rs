use std::str::FromStr;
use tracing_subscriber::EnvFilter;
use zunit_core::{Harness, MultiReporter, Options, Outcome, Reporter, ResultGraph, Runnable};

use crate::ListReporter;

/// Environment variable holding the `tracing` filter directives.
const ZUNIT_LOG_ENV: &str = "ZUNIT_LOG";

/// Install a `tracing` fmt subscriber filtered by `ZUNIT_LOG` (default `info`).
/// Calling it again once a subscriber is installed does nothing.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_env(ZUNIT_LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Run a tree through a [`Harness`] configured from `zunit.toml` and report to
/// `reporter`. Fails when the root of the tree failed.
pub async fn run(
    tree: impl Into<Runnable>,
    reporter: &mut dyn Reporter,
) -> eyre::Result<ResultGraph> {
    let mut harness = Harness::new(tree);
    let graph = harness.run(reporter, &Options::new()).await?;
    if graph.result() == Outcome::Failed {
        eyre::bail!("one or more tests failed");
    }
    Ok(graph)
}

/// zunit console application.
#[derive(Default)]
pub struct App {
    options: Options,
    color: Option<Color>,
    third_party_reporters: Vec<Box<dyn Reporter>>,
}

impl App {
    pub fn new() -> App {
        App::default()
    }

    /// Runtime options layer; wins over `zunit.toml` and the tree's own options.
    pub fn options(mut self, options: Options) -> App {
        self.options = options;
        self
    }

    /// Force colored output on or off. Falls back to `CARGO_TERM_COLOR` when unset.
    pub fn color(mut self, color: Color) -> App {
        self.color = Some(color);
        self
    }

    /// Install a reporter notified alongside the console output.
    pub fn install_reporter(&mut self, reporter: impl Reporter + 'static) {
        self.third_party_reporters.push(Box::new(reporter));
    }

    /// Run the tree with console output.
    pub async fn run(mut self, tree: impl Into<Runnable>) -> eyre::Result<ResultGraph> {
        init_logging();
        apply_color(self.color.clone());

        let mut list = ListReporter::new();
        let mut reporters = MultiReporter::new().add(&mut list);
        for reporter in self.third_party_reporters.iter_mut() {
            reporters = reporters.add(reporter.as_mut());
        }

        let mut harness = Harness::new(tree);
        let graph = harness.run(&mut reporters, &self.options).await?;
        if graph.result() == Outcome::Failed {
            eyre::bail!("one or more tests failed");
        }
        Ok(graph)
    }
}

fn apply_color(color_command: Option<Color>) {
    let color_env = std::env::var("CARGO_TERM_COLOR");
    let color = match (color_command, color_env) {
        (color @ Some(Color::Always), _) => color,
        (color @ Some(Color::Never), _) => color,
        (None, Ok(color)) => Color::from_str(&color).ok(),
        _ => None,
    };
    match color {
        Some(Color::Always) => {
            console::set_colors_enabled(true);
            console::set_colors_enabled_stderr(true);
        }
        Some(Color::Never) => {
            console::set_colors_enabled(false);
            console::set_colors_enabled_stderr(false);
        }
        _ => {}
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    #[default]
    Auto,
    Always,
    Never,
}
