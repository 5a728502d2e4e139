//! Harness.
//!
//! Orchestrates one top-level run of a runnable tree:
//!
//! ```text
//! +-------------------+     +-------------------+     +-------------------+
//! | harness options   | --> | Options::apply    | --> | finalise(1)       |
//! | + runtime options |     | runtime wins      |     | numbered copy     |
//! +-------------------+     +-------------------+     +-------------------+
//!                                                              |
//!                                                              v
//! +-------------------+     +-------------------+     +-------------------+
//! | on_finished       | <-- | GraphReporter     | <-- | run, fanned out   |
//! | result graph      |     | into_graph        |     | to all reporters  |
//! +-------------------+     +-------------------+     +-------------------+
//! ```
//!
//! Exclusive mode is engaged automatically when any node of the finalised tree
//! carries an exclusive marker.

use tracing::*;

use crate::{
    config::get_config,
    finalise::Finalised,
    graph::ResultGraph,
    options::Options,
    reporter::{notify, GraphReporter, MultiReporter, Reporter},
    runnable::Runnable,
    Error, Result,
};

/// Runs a runnable tree and keeps the report of the last completed run.
///
/// Issuing two runs of the same harness concurrently is not supported; `run`
/// takes `&mut self`, so the borrow checker rules it out.
#[derive(Debug, Default)]
pub struct Harness {
    runnable: Option<Runnable>,
    options: Options,
    finalised: Option<Finalised>,
    report: Option<ResultGraph>,
}

impl Harness {
    /// Create a harness whose initial options come from the global configuration.
    pub fn new(runnable: impl Into<Runnable>) -> Harness {
        Harness::with_options(runnable, get_config().options)
    }

    pub fn with_options(runnable: impl Into<Runnable>, options: Options) -> Harness {
        Harness {
            runnable: Some(runnable.into()),
            options,
            finalised: None,
            report: None,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The definition tree this harness runs.
    pub fn runnable(&self) -> Option<&Runnable> {
        self.runnable.as_ref()
    }

    /// The numbered copy of the last run, if any.
    pub fn finalised(&self) -> Option<&Finalised> {
        self.finalised.as_ref()
    }

    /// Number of tests in the finalised tree, or in the definition tree before the
    /// first run.
    pub fn number_of_tests(&self) -> usize {
        match (&self.finalised, &self.runnable) {
            (Some(finalised), _) => finalised.number_of_tests(),
            (None, Some(runnable)) => runnable.number_of_tests(),
            (None, None) => 0,
        }
    }

    /// Result graph of the last completed run.
    pub fn report(&self) -> Option<&ResultGraph> {
        self.report.as_ref()
    }

    /// Run the tree. Failures of individual tests are recorded in the returned graph;
    /// only a harness without a tree fails the call.
    pub async fn run(
        &mut self,
        reporter: &mut dyn Reporter,
        runtime: &Options,
    ) -> Result<ResultGraph> {
        let Some(runnable) = &self.runnable else {
            return Err(Error::Configuration);
        };

        let options = self.options.apply(runtime);
        let mut finalised = runnable.finalise(1);
        let exclusive = finalised.has_exclusive(&options);
        let number_of_tests = finalised.number_of_tests();

        info!("running {number_of_tests} tests");
        if exclusive {
            info!("exclusive mode engaged");
        }
        notify("start", finalised.name(), reporter.on_started(number_of_tests).await);

        let mut graph_reporter = GraphReporter::new();
        {
            let mut reporters = MultiReporter::new()
                .add(&mut graph_reporter)
                .add(&mut *reporter);
            finalised.run(&mut reporters, &options, exclusive).await;
        }
        let report = graph_reporter.into_graph()?;

        let stats = report.stats();
        info!(
            "{} {}: {} passed, {} failed, {} skipped, {} excluded",
            report.name(),
            report.result(),
            stats.passed,
            stats.failed,
            stats.skipped,
            stats.excluded
        );

        self.finalised = Some(finalised);
        self.report = Some(report.clone());
        notify("finish", report.name(), reporter.on_finished(&report).await);

        Ok(report)
    }
}
