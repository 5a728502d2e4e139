//! # Options
//!
//! Layered run options. Every runnable carries an *initial* layer authored at
//! construction time, every run call receives a *runtime* layer, and the
//! *effective* options applied to a node are obtained by letting the runtime
//! layer win key by key over the initial layer.
//!
//! ```text
//! +-------------------+     +-------------------+     +-------------------+
//! | initial layer     | --> | Options::merge    | --> | Effective         |
//! | (per runnable)    |     | runtime wins      |     | skip/abort/...    |
//! +-------------------+     +-------------------+     +-------------------+
//!                                    ^
//!                                    |
//!                           +-------------------+
//!                           | runtime layer     |
//!                           | (per run call)    |
//!                           +-------------------+
//! ```
//!
//! Options can be deserialized, so that a layer can be read from the `[options]`
//! table of `zunit.toml`. Unknown keys are ignored.
//!
//! ```toml
//! [options]
//! abort = true
//! timeout = "2s"
//! ```

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One layer of recognized options. `None` means "not set in this layer".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Options {
    /// Skip the runnable (and the whole subtree of a suite).
    #[serde(default)]
    pub skip: Option<bool>,
    /// Skip the remaining children of a suite after its first failing child.
    #[serde(default)]
    pub abort: Option<bool>,
    /// Mark the runnable as eligible when exclusive mode is engaged.
    #[serde(default)]
    pub exclusive: Option<bool>,
    /// Fail a test whose work has not settled within this duration.
    #[serde(default)]
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

/// Options resolved against their defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Effective {
    pub skip: bool,
    pub abort: bool,
    pub exclusive: bool,
    pub timeout: Option<Duration>,
}

impl Options {
    pub fn new() -> Options {
        Options::default()
    }

    pub fn with_skip(mut self, skip: bool) -> Options {
        self.skip = Some(skip);
        self
    }

    pub fn with_abort(mut self, abort: bool) -> Options {
        self.abort = Some(abort);
        self
    }

    pub fn with_exclusive(mut self, exclusive: bool) -> Options {
        self.exclusive = Some(exclusive);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Options {
        self.timeout = Some(timeout);
        self
    }

    /// Layer `runtime` over `self`. Keys set in `runtime` win, keys left unset fall
    /// back to `self`. Neither input is modified.
    pub fn apply(&self, runtime: &Options) -> Options {
        Options {
            skip: runtime.skip.or(self.skip),
            abort: runtime.abort.or(self.abort),
            exclusive: runtime.exclusive.or(self.exclusive),
            timeout: runtime.timeout.or(self.timeout),
        }
    }

    /// Layer `runtime` over `self` and resolve unset keys to their defaults.
    pub fn merge(&self, runtime: &Options) -> Effective {
        let layered = self.apply(runtime);
        Effective {
            skip: layered.skip.unwrap_or_default(),
            abort: layered.abort.unwrap_or_default(),
            exclusive: layered.exclusive.unwrap_or_default(),
            timeout: layered.timeout,
        }
    }
}
