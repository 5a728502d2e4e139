//! # zunit Core
//!
//! The execution engine of the zunit test harness.
//!
//! This crate provides:
//! - Tests and suites that can be nested into reusable definition trees
//! - Layered options (`skip`, `abort`, `exclusive`, `timeout`)
//! - Finalisation into numbered, one-shot execution plans
//! - The reporter boundary and the graph-building reporter
//! - The harness orchestrating a top-level run
//!
//! ## Architecture (block diagram)
//!
//! ```text
//! +---------------------+      +---------------------+      +---------------------+
//! | definition tree     | ---> | harness             | ---> | reporters           |
//! | Suite / Test        |      | finalise + run      |      | Graph/Null/Multi    |
//! +---------------------+      +---------------------+      +---------------------+
//!                                    ^                                 |
//!                                    |                                 v
//! +---------------------+            |                      +---------------------+
//! | options + config    | -----------+                      | result graph        |
//! | zunit.toml, ZUNIT_* |                                   | resolve(path)       |
//! +---------------------+                                   +---------------------+
//! ```
//!
//! Most users should use the main `zunit` crate rather than importing `zunit-core`
//! directly.

pub mod config;
pub mod error;
pub mod finalise;
pub mod graph;
pub mod harness;
pub mod options;
pub mod reporter;
pub mod runnable;
pub mod suite;

// Re-export error handling crates
pub use eyre;

// Re-export key functionality
pub use config::{get_config, Config};
pub use error::{Error, Result};
pub use finalise::Finalised;
pub use graph::{Kind, Resolve, ResultGraph, ResultNode};
pub use harness::Harness;
pub use options::{Effective, Options};
pub use reporter::{GraphReporter, MultiReporter, NullReporter, Reporter};
pub use runnable::{Outcome, Runnable, Stats, Status};
pub use suite::Suite;
pub use test::{Failure, Test, TestContext, Work};
