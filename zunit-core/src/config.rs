//! # Configuration Module
//!
//! Loads the harness-level options layer from `zunit.toml` and `ZUNIT_*`
//! environment variables.
//!
//! ## Configuration Loading Flow (block diagram)
//!
//! ```text
//! +-------------------+     +-------------------+     +-------------------+
//! | ZUNIT_CONFIG env  | --> | Path resolution   | --> | zunit.toml file   |
//! | (optional)        |     | or default ./     |     |                   |
//! +-------------------+     +-------------------+     +-------------------+
//!                                                              |
//!                                                              v
//! +-------------------+     +-------------------+     +-------------------+
//! | Environment vars  | --> | ZUNIT_SKIP, ...   | --> | Config.options    |
//! | (override file)   |     | parsed per key    |     | initial layer     |
//! +-------------------+     +-------------------+     +-------------------+
//! ```
//!
//! ## Config File Location
//!
//! 1. If `ZUNIT_CONFIG` environment variable is set, load from that path
//! 2. Otherwise, load from `zunit.toml` in the current directory
//!
//! ## Configuration Structure
//!
//! ```toml
//! [options]
//! abort = true
//! timeout = "2s"
//! ```
//!
//! ## Environment Overrides
//!
//! | variable          | value                       |
//! |-------------------|-----------------------------|
//! | `ZUNIT_SKIP`      | `true` / `false`            |
//! | `ZUNIT_ABORT`     | `true` / `false`            |
//! | `ZUNIT_EXCLUSIVE` | `true` / `false`            |
//! | `ZUNIT_TIMEOUT`   | timeout in milliseconds     |

use once_cell::sync::Lazy;
use serde::Deserialize;
use std::{io::Read, path::Path, str::FromStr, time::Duration};
use tracing::*;

use crate::{options::Options, Error, Result};

/// Environment variable name for specifying the config file path.
const ZUNIT_CONFIG_ENV: &str = "ZUNIT_CONFIG";
const ZUNIT_SKIP_ENV: &str = "ZUNIT_SKIP";
const ZUNIT_ABORT_ENV: &str = "ZUNIT_ABORT";
const ZUNIT_EXCLUSIVE_ENV: &str = "ZUNIT_EXCLUSIVE";
const ZUNIT_TIMEOUT_ENV: &str = "ZUNIT_TIMEOUT";

static CONFIG: Lazy<Config> = Lazy::new(|| {
    let _ = dotenv::dotenv();
    Config::load().unwrap_or_else(|e| {
        error!("{e}");
        Config::default()
    })
});

/// Get the process-wide configuration. It is loaded on first access.
pub fn get_config() -> &'static Config {
    &CONFIG
}

/// zunit's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Initial options layer applied by the harness.
    #[serde(default)]
    pub options: Options,
}

impl Config {
    /// Load zunit configuration from path. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Config> {
        let mut cfg = match std::fs::File::open(path) {
            Ok(mut file) => {
                let mut buf = String::new();
                file.read_to_string(&mut buf)
                    .map_err(|e| Error::LoadError(e.to_string()))?;
                let cfg: Config = toml::from_str(&buf).map_err(|e| {
                    Error::LoadError(format!(
                        "failed to deserialize zunit.toml into zunit::Config: {e}"
                    ))
                })?;
                debug!("zunit.toml was successfully loaded: {cfg:#?}");
                cfg
            }
            Err(_) => Config::default(),
        };

        cfg.load_env()?;

        Ok(cfg)
    }

    /// Load zunit configuration.
    ///
    /// Loading order:
    /// 1. If `ZUNIT_CONFIG` env var is set, load from that path
    /// 2. Otherwise, load from `zunit.toml` in the current directory
    pub fn load() -> Result<Config> {
        match std::env::var(ZUNIT_CONFIG_ENV) {
            Ok(path) => {
                let path = Path::new(&path);
                if !path.exists() {
                    return Err(Error::LoadError(format!(
                        "Config file specified by {ZUNIT_CONFIG_ENV} not found: {:?}",
                        path
                    )));
                }

                debug!("Loading config from {ZUNIT_CONFIG_ENV}={:?}", path);
                Config::load_from(path)
            }
            Err(_) => Config::load_from(Path::new("zunit.toml")),
        }
    }

    /// Layer `ZUNIT_*` environment variables over the options read from file.
    fn load_env(&mut self) -> Result<()> {
        let overrides = Options {
            skip: env_value(ZUNIT_SKIP_ENV)?,
            abort: env_value(ZUNIT_ABORT_ENV)?,
            exclusive: env_value(ZUNIT_EXCLUSIVE_ENV)?,
            timeout: env_value(ZUNIT_TIMEOUT_ENV)?.map(Duration::from_millis),
        };
        self.options = self.options.apply(&overrides);

        debug!("zunit configuration loaded from env: {self:#?}");
        Ok(())
    }
}

fn env_value<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Ok(value) = std::env::var(key) else {
        return Ok(None);
    };
    value
        .trim()
        .parse()
        .map(Some)
        .map_err(|e| Error::ValueError(key.to_string(), eyre::Report::new(e)))
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    fn sample_path() -> std::path::PathBuf {
        let manifest_dir = env!("CARGO_MANIFEST_DIR");
        Path::new(manifest_dir).join("../zunit-sample.toml")
    }

    fn clear_env() {
        for key in [
            ZUNIT_CONFIG_ENV,
            ZUNIT_SKIP_ENV,
            ZUNIT_ABORT_ENV,
            ZUNIT_EXCLUSIVE_ENV,
            ZUNIT_TIMEOUT_ENV,
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn load_config() -> eyre::Result<()> {
        clear_env();
        let cfg = Config::load_from(&sample_path())?;
        assert_eq!(
            cfg.options,
            Options::new()
                .with_abort(true)
                .with_timeout(Duration::from_secs(2))
        );
        Ok(())
    }

    #[test]
    #[serial]
    fn missing_file_yields_defaults() -> eyre::Result<()> {
        clear_env();
        let cfg = Config::load_from(Path::new("/nonexistent/zunit.toml"))?;
        assert_eq!(cfg, Config::default());
        Ok(())
    }

    #[test]
    #[serial]
    fn env_overrides() -> eyre::Result<()> {
        let cases = [
            (ZUNIT_SKIP_ENV, "true", Options::new().with_skip(true)),
            (ZUNIT_ABORT_ENV, "false", Options::new().with_abort(false)),
            (ZUNIT_EXCLUSIVE_ENV, " true ", Options::new().with_exclusive(true)),
            (
                ZUNIT_TIMEOUT_ENV,
                "150",
                Options::new().with_timeout(Duration::from_millis(150)),
            ),
        ];
        for (key, value, expected) in cases {
            clear_env();
            std::env::set_var(key, value);
            let cfg = Config::load_from(Path::new("/nonexistent/zunit.toml"));
            clear_env();
            assert_eq!(cfg?.options, expected, "{key}={value}");
        }
        Ok(())
    }

    #[test]
    #[serial]
    fn env_overrides_file() -> eyre::Result<()> {
        clear_env();
        std::env::set_var(ZUNIT_ABORT_ENV, "false");
        let cfg = Config::load_from(&sample_path());
        clear_env();
        let cfg = cfg?;
        assert_eq!(cfg.options.abort, Some(false));
        assert_eq!(cfg.options.timeout, Some(Duration::from_secs(2)));
        Ok(())
    }

    #[test]
    #[serial]
    fn error_on_invalid_env_value() {
        for (key, value) in [(ZUNIT_SKIP_ENV, "yes"), (ZUNIT_TIMEOUT_ENV, "2s")] {
            clear_env();
            std::env::set_var(key, value);
            let result = Config::load_from(Path::new("/nonexistent/zunit.toml"));
            clear_env();
            match result {
                Err(Error::ValueError(k, _)) => assert_eq!(k, key),
                other => panic!("expected a value error for {key}={value}, got {other:?}"),
            }
        }
    }

    mod zunit_config_env {
        use super::{clear_env, sample_path, Config, ZUNIT_CONFIG_ENV};
        use pretty_assertions::assert_eq;
        use serial_test::serial;

        #[test]
        #[serial]
        fn load_from_zunit_config_env() {
            clear_env();
            std::env::set_var(ZUNIT_CONFIG_ENV, sample_path());
            let cfg = Config::load();
            clear_env();

            assert_eq!(cfg.unwrap().options.abort, Some(true));
        }

        #[test]
        #[serial]
        fn error_when_file_not_found() {
            clear_env();
            std::env::set_var(ZUNIT_CONFIG_ENV, "/nonexistent/path/zunit.toml");
            let result = Config::load();
            clear_env();

            assert!(result.is_err());
            let err = result.unwrap_err().to_string();
            assert!(err.contains("not found"), "error should mention file not found: {err}");
        }
    }
}
