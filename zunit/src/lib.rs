//! # zunit - hierarchical, async-friendly test harness
//!
//! zunit runs trees of tests and suites with layered options, per-test
//! timeouts, exclusive filtering and fail-fast abort, and reports every node
//! to pluggable reporters.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use zunit::{eyre, App, Options, Suite, Test};
//!
//! #[tokio::main]
//! async fn main() -> eyre::Result<()> {
//!     let suite = Suite::new("arithmetic")
//!         .add(Test::new("adds", |_| async {
//!             eyre::ensure!(1 + 1 == 2, "maths is broken");
//!             Ok(())
//!         }))
//!         .add(
//!             Test::new("slow", |_| async {
//!                 tokio::time::sleep(Duration::from_secs(10)).await;
//!                 Ok(())
//!             })
//!             .with_options(Options::new().with_timeout(Duration::from_millis(100))),
//!         )
//!         .add(Test::pending("divides"));
//!
//!     App::new().run(suite).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Options
//!
//! Every node carries an optional `skip`, `abort`, `exclusive` and `timeout`.
//! Options given at run time win over the harness layer (from `zunit.toml` and
//! `ZUNIT_*` variables), which wins over the node's own options.
//!
//! ## Logging
//!
//! [`init_logging`] installs a `tracing` subscriber filtered by `ZUNIT_LOG`.

mod app;
mod reporter;

pub use app::{init_logging, run, App, Color};
pub use reporter::ListReporter;

pub use zunit_core::{
    self, eyre, get_config, Config, Effective, Error, Failure, Finalised, GraphReporter, Harness,
    Kind, MultiReporter, NullReporter, Options, Outcome, Reporter, Resolve, Result, ResultGraph,
    ResultNode, Runnable, Stats, Status, Suite, Test, TestContext, Work,
};

/// Re-export of `async_trait` for implementing [`Reporter`].
pub use async_trait::async_trait;
