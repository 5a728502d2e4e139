//! Shared shape of tests and suites.
//!
//! A [`Runnable`] is either a leaf [`Test`] or a composite [`Suite`]. Both carry a
//! [`Status`] record that a run moves from [`Outcome::Pending`] through
//! [`Outcome::Running`] to a terminal outcome.

use futures::future::BoxFuture;
use futures::FutureExt;
use serde::Serialize;
use std::time::Duration;

use crate::{
    finalise::Finalised,
    graph::Resolve,
    options::Options,
    reporter::Reporter,
    suite::Suite,
    test::{Failure, Test},
};

/// Result of a runnable.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    strum::Display,
    strum::AsRefStr,
    strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    #[default]
    Pending,
    Running,
    Passed,
    Failed,
    Skipped,
}

/// Per-node state written by a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Status {
    pub result: Outcome,
    /// Present only when `result` is [`Outcome::Failed`].
    pub error: Option<Failure>,
    /// Elapsed time of the attempt. Unset for skipped runnables.
    pub duration: Option<Duration>,
    /// Execution number. Only finalised runnables carry one.
    pub number: Option<usize>,
}

impl Status {
    pub(crate) fn numbered(number: usize) -> Status {
        Status {
            number: Some(number),
            ..Default::default()
        }
    }

    /// Forget the outcome of the previous run. The execution number is kept.
    pub(crate) fn reset(&mut self) {
        self.result = Outcome::Pending;
        self.error = None;
        self.duration = None;
    }

    pub fn passed(&self) -> bool {
        self.result == Outcome::Passed
    }

    pub fn failed(&self) -> bool {
        self.result == Outcome::Failed
    }

    pub fn skipped(&self) -> bool {
        self.result == Outcome::Skipped
    }
}

/// Leaf counts over a subtree.
///
/// `excluded` counts tests that were filtered out by exclusive mode. They are
/// reported as [`Outcome::Skipped`] but are not tallied under `skipped`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub excluded: usize,
}

impl Stats {
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.excluded
    }

    pub(crate) fn of(outcome: Outcome) -> Stats {
        let mut stats = Stats::default();
        match outcome {
            Outcome::Passed => stats.passed = 1,
            Outcome::Failed => stats.failed = 1,
            Outcome::Skipped => stats.skipped = 1,
            Outcome::Pending | Outcome::Running => {}
        }
        stats
    }

    pub(crate) fn add(&mut self, other: Stats) {
        self.passed += other.passed;
        self.failed += other.failed;
        self.skipped += other.skipped;
        self.excluded += other.excluded;
    }

    /// Outcome of a suite with these counts. A suite without leaves passes.
    pub(crate) fn outcome(&self) -> Outcome {
        if self.failed > 0 {
            Outcome::Failed
        } else if self.passed == 0 && self.total() > 0 {
            Outcome::Skipped
        } else {
            Outcome::Passed
        }
    }
}

/// Either a test or a suite.
#[derive(Debug, Clone)]
pub enum Runnable {
    Test(Test),
    Suite(Suite),
}

impl From<Test> for Runnable {
    fn from(test: Test) -> Runnable {
        Runnable::Test(test)
    }
}

impl From<Suite> for Runnable {
    fn from(suite: Suite) -> Runnable {
        Runnable::Suite(suite)
    }
}

impl Runnable {
    pub fn name(&self) -> &str {
        match self {
            Runnable::Test(test) => test.name(),
            Runnable::Suite(suite) => suite.name(),
        }
    }

    pub fn options(&self) -> &Options {
        match self {
            Runnable::Test(test) => test.options(),
            Runnable::Suite(suite) => suite.options(),
        }
    }

    pub fn status(&self) -> &Status {
        match self {
            Runnable::Test(test) => test.status(),
            Runnable::Suite(suite) => suite.status(),
        }
    }

    pub fn result(&self) -> Outcome {
        self.status().result
    }

    pub fn number(&self) -> Option<usize> {
        self.status().number
    }

    pub fn as_test(&self) -> Option<&Test> {
        match self {
            Runnable::Test(test) => Some(test),
            Runnable::Suite(_) => None,
        }
    }

    pub fn as_suite(&self) -> Option<&Suite> {
        match self {
            Runnable::Test(_) => None,
            Runnable::Suite(suite) => Some(suite),
        }
    }

    /// Leaf counts of the last run. A test contributes exactly one leaf.
    pub fn stats(&self) -> Stats {
        match self {
            Runnable::Test(test) => Stats::of(test.status().result),
            Runnable::Suite(suite) => suite.stats(),
        }
    }

    /// Number of tests in this subtree.
    pub fn number_of_tests(&self) -> usize {
        match self {
            Runnable::Test(_) => 1,
            Runnable::Suite(suite) => suite.number_of_tests(),
        }
    }

    /// Whether this runnable, or any runnable below it, is exclusive once `runtime`
    /// is layered over its own options.
    pub fn has_exclusive(&self, runtime: &Options) -> bool {
        match self {
            Runnable::Test(test) => test.options().merge(runtime).exclusive,
            Runnable::Suite(suite) => suite.has_exclusive(runtime),
        }
    }

    /// Produce an independent, numbered copy of this tree. Numbers are assigned in
    /// pre-order starting at `start`.
    pub fn finalise(&self, start: usize) -> Finalised {
        let mut next = start;
        Finalised::new(self.numbered(&mut next))
    }

    pub(crate) fn numbered(&self, next: &mut usize) -> Runnable {
        match self {
            Runnable::Test(test) => Runnable::Test(test.numbered(next)),
            Runnable::Suite(suite) => Runnable::Suite(suite.numbered(next)),
        }
    }

    /// Run this runnable. `exclusive` engages exclusive-mode filtering in suites.
    pub fn run<'a>(
        &'a mut self,
        reporter: &'a mut dyn Reporter,
        runtime: &'a Options,
        exclusive: bool,
    ) -> BoxFuture<'a, ()> {
        match self {
            Runnable::Test(test) => test.run(reporter, runtime).boxed(),
            Runnable::Suite(suite) => suite.run(reporter, runtime, exclusive),
        }
    }
}

impl Resolve for Runnable {
    fn children(&self) -> &[Runnable] {
        match self {
            Runnable::Test(_) => &[],
            Runnable::Suite(suite) => suite.children(),
        }
    }
}
