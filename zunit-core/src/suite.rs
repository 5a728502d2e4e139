//! Composite runnable.
//!
//! A [`Suite`] runs its children one after another in insertion order. Three
//! directives shape a run:
//!
//! - `skip` marks the suite and its whole subtree skipped. Every descendant is
//!   still visited and reported, but no work is invoked.
//! - `abort` skips the remaining siblings after the first failing child.
//! - exclusive mode, when engaged by the caller, restricts a suite whose children
//!   carry exclusive markers to the children that are, or contain, one. A suite
//!   whose children carry no marker runs all of them, so a granted branch runs
//!   whole and a tree without markers runs normally.

use futures::{future::BoxFuture, FutureExt};
use std::time::{Duration, Instant};
use tracing::*;

use crate::{
    options::Options,
    reporter::{notify, Reporter},
    runnable::{Outcome, Runnable, Stats, Status},
};

#[derive(Debug, Clone)]
pub struct Suite {
    name: String,
    options: Options,
    children: Vec<Runnable>,
    status: Status,
    stats: Stats,
}

impl Suite {
    pub fn new(name: impl Into<String>) -> Suite {
        Suite {
            name: name.into(),
            options: Options::default(),
            children: Vec::new(),
            status: Status::default(),
            stats: Stats::default(),
        }
    }

    pub fn with_options(mut self, options: Options) -> Suite {
        self.options = options;
        self
    }

    /// Append a child. Children run, and are numbered, in the order they are added.
    pub fn add(mut self, child: impl Into<Runnable>) -> Suite {
        self.children.push(child.into());
        self
    }

    pub fn extend<I, R>(mut self, children: I) -> Suite
    where
        I: IntoIterator<Item = R>,
        R: Into<Runnable>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn children(&self) -> &[Runnable] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&Runnable> {
        self.children.get(index)
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    pub fn result(&self) -> Outcome {
        self.status.result
    }

    pub fn duration(&self) -> Option<Duration> {
        self.status.duration
    }

    pub fn number(&self) -> Option<usize> {
        self.status.number
    }

    /// Leaf counts of the last run.
    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn passed(&self) -> bool {
        self.status.passed()
    }

    pub fn failed(&self) -> bool {
        self.status.failed()
    }

    pub fn skipped(&self) -> bool {
        self.status.skipped()
    }

    pub fn number_of_tests(&self) -> usize {
        self.children.iter().map(Runnable::number_of_tests).sum()
    }

    pub fn has_exclusive(&self, runtime: &Options) -> bool {
        self.options.merge(runtime).exclusive
            || self.children.iter().any(|child| child.has_exclusive(runtime))
    }

    pub(crate) fn numbered(&self, next: &mut usize) -> Suite {
        let number = *next;
        *next += 1;
        Suite {
            name: self.name.clone(),
            options: self.options,
            children: self
                .children
                .iter()
                .map(|child| child.numbered(next))
                .collect(),
            status: Status::numbered(number),
            stats: Stats::default(),
        }
    }

    /// Run the suite, overwriting the outcome of any previous run. `exclusive`
    /// engages exclusive-mode filtering for this suite and its descendants.
    pub fn run<'a>(
        &'a mut self,
        reporter: &'a mut dyn Reporter,
        runtime: &'a Options,
        exclusive: bool,
    ) -> BoxFuture<'a, ()> {
        async move {
            let options = self.options.merge(runtime);
            self.status.reset();
            self.stats = Stats::default();
            self.status.result = Outcome::Running;

            notify("suite start", &self.name, reporter.on_suite_start(self).await);
            let started = Instant::now();

            let skipping = runtime.apply(&Options::new().with_skip(true));
            let skipped = options.skip || self.options.skip == Some(true);
            if skipped {
                debug!("suite \"{}\" skipped", self.name);
                for child in &mut self.children {
                    child.run(reporter, &skipping, false).await;
                    self.stats.add(child.stats());
                }
            } else {
                let filtering =
                    exclusive && self.children.iter().any(|child| child.has_exclusive(runtime));
                let mut aborted = false;
                for child in &mut self.children {
                    if aborted {
                        child.run(reporter, &skipping, false).await;
                        self.stats.add(child.stats());
                        continue;
                    }
                    if filtering && !child.has_exclusive(runtime) {
                        debug!("\"{}\" excluded by exclusive mode", child.name());
                        child.run(reporter, &skipping, false).await;
                        self.stats.excluded += child.number_of_tests();
                        continue;
                    }

                    child.run(reporter, runtime, exclusive).await;
                    self.stats.add(child.stats());

                    if options.abort && child.status().failed() {
                        warn!(
                            "\"{}\" failed, aborting remaining runnables of suite \"{}\"",
                            child.name(),
                            self.name
                        );
                        aborted = true;
                    }
                }
            }

            if skipped {
                self.status.result = Outcome::Skipped;
            } else {
                self.status.result = self.stats.outcome();
                self.status.duration = Some(started.elapsed());
            }

            notify("suite end", &self.name, reporter.on_suite_end(self).await);
        }
        .boxed()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{reporter::NullReporter, test::Test};
    use pretty_assertions::assert_eq;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    fn pass(name: &str) -> Test {
        Test::new(name, |_| async { Ok(()) })
    }

    fn fail(name: &str) -> Test {
        Test::new(name, |_| async { Err(eyre::eyre!("Oh Noes!")) })
    }

    fn counted(name: &str, calls: &Arc<AtomicUsize>) -> Test {
        let calls = calls.clone();
        Test::new(name, move |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(()) }
        })
    }

    fn child(suite: &Suite, index: usize) -> &Runnable {
        &suite.children()[index]
    }

    fn stats(passed: usize, failed: usize, skipped: usize) -> Stats {
        Stats {
            passed,
            failed,
            skipped,
            excluded: 0,
        }
    }

    #[tokio::test]
    async fn reports_successful_tests() {
        let mut suite = Suite::new("Test Suite").add(pass("Test 1")).add(pass("Test 2"));
        suite.run(&mut NullReporter, &Options::new(), false).await;

        assert!(suite.passed());
        assert_eq!(child(&suite, 0).result(), Outcome::Passed);
        assert_eq!(child(&suite, 1).result(), Outcome::Passed);
    }

    #[tokio::test]
    async fn reports_failing_tests() {
        let mut suite = Suite::new("Test Suite").add(pass("Test 1")).add(fail("Test 2"));
        suite.run(&mut NullReporter, &Options::new(), false).await;

        assert!(suite.failed());
        assert_eq!(child(&suite, 0).result(), Outcome::Passed);
        assert_eq!(child(&suite, 1).result(), Outcome::Failed);
        assert_eq!(suite.stats(), stats(1, 1, 0));
    }

    #[tokio::test]
    async fn empty_suite_passes() {
        let mut suite = Suite::new("Empty");
        suite.run(&mut NullReporter, &Options::new(), false).await;

        assert!(suite.passed());
        assert_eq!(suite.stats(), Stats::default());
    }

    #[tokio::test]
    async fn skips_every_test_of_the_run() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut suite = Suite::new("Test Suite")
            .add(counted("Test 1", &calls))
            .add(counted("Test 2", &calls));
        suite
            .run(&mut NullReporter, &Options::new().with_skip(true), false)
            .await;

        assert!(suite.skipped());
        assert_eq!(child(&suite, 0).result(), Outcome::Skipped);
        assert_eq!(child(&suite, 1).result(), Outcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn skips_the_entire_suite() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut suite = Suite::new("Test Suite")
            .with_options(Options::new().with_skip(true))
            .add(counted("Test 1", &calls))
            .add(Suite::new("Nested").add(fail("Test 2")));
        suite.run(&mut NullReporter, &Options::new(), false).await;

        assert!(suite.skipped());
        assert_eq!(child(&suite, 0).result(), Outcome::Skipped);
        assert_eq!(child(&suite, 1).result(), Outcome::Skipped);
        assert_eq!(suite.stats(), stats(0, 0, 2));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn configured_skip_is_not_overridden_by_runtime() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut suite = Suite::new("Test Suite")
            .with_options(Options::new().with_skip(true))
            .add(counted("Test 1", &calls));
        suite
            .run(&mut NullReporter, &Options::new().with_skip(false), false)
            .await;

        assert!(suite.skipped());
        assert_eq!(child(&suite, 0).result(), Outcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn skipped_empty_suite_is_skipped() {
        let mut suite = Suite::new("Empty").with_options(Options::new().with_skip(true));
        suite.run(&mut NullReporter, &Options::new(), false).await;

        assert!(suite.skipped());
        assert!(suite.duration().is_none());
        assert_eq!(suite.stats(), Stats::default());
    }

    #[tokio::test]
    async fn empty_suites_after_an_abort_are_skipped() {
        let mut parent = Suite::new("Parent")
            .with_options(Options::new().with_abort(true))
            .add(fail("Test 1"))
            .add(Suite::new("Empty"));
        parent.run(&mut NullReporter, &Options::new(), false).await;

        let empty = child(&parent, 1).as_suite().expect("suite");
        assert!(empty.skipped());
        assert!(empty.duration().is_none());
        assert!(parent.failed());
    }

    #[tokio::test]
    async fn skips_individual_tests() {
        let mut suite = Suite::new("Test Suite")
            .add(pass("Test 1"))
            .add(pass("Test 2").with_options(Options::new().with_skip(true)));
        suite.run(&mut NullReporter, &Options::new(), false).await;

        assert!(suite.passed());
        assert_eq!(child(&suite, 0).result(), Outcome::Passed);
        assert_eq!(child(&suite, 1).result(), Outcome::Skipped);
        assert_eq!(suite.stats(), stats(1, 0, 1));
    }

    #[tokio::test]
    async fn aborts_early_from_runtime_options() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut suite = Suite::new("Test Suite")
            .add(fail("Test 1"))
            .add(counted("Test 2", &calls));
        suite
            .run(&mut NullReporter, &Options::new().with_abort(true), false)
            .await;

        assert!(suite.failed());
        assert_eq!(child(&suite, 0).result(), Outcome::Failed);
        assert_eq!(child(&suite, 1).result(), Outcome::Skipped);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn aborts_early_from_configuration() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut suite = Suite::new("Test Suite")
            .with_options(Options::new().with_abort(true))
            .add(fail("Test 1"))
            .add(Suite::new("Rest").add(counted("Test 2", &calls)));
        suite.run(&mut NullReporter, &Options::new(), false).await;

        assert!(suite.failed());
        assert_eq!(child(&suite, 0).result(), Outcome::Failed);
        assert_eq!(child(&suite, 1).result(), Outcome::Skipped);
        assert_eq!(suite.stats(), stats(0, 1, 1));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn runs_only_exclusive_tests() {
        let mut suite = Suite::new("Test Suite")
            .add(pass("Test 1"))
            .add(pass("Test 2").with_options(Options::new().with_exclusive(true)));
        suite.run(&mut NullReporter, &Options::new(), true).await;

        assert_eq!(suite.stats().passed, 1);
        assert_eq!(suite.stats().failed, 0);
        assert_eq!(suite.stats().skipped, 0);
        assert_eq!(suite.stats().excluded, 1);
        assert_eq!(child(&suite, 0).result(), Outcome::Skipped);
    }

    #[tokio::test]
    async fn runs_only_exclusive_suites() {
        let mut parent = Suite::new("Parent")
            .add(
                Suite::new("Child 1")
                    .with_options(Options::new().with_exclusive(true))
                    .add(pass("Test 1"))
                    .add(pass("Test 2")),
            )
            .add(Suite::new("Child 2").add(fail("Test 3")));
        parent.run(&mut NullReporter, &Options::new(), true).await;

        assert_eq!(parent.stats(), Stats { passed: 2, excluded: 1, ..Default::default() });
        assert!(parent.passed());
        assert_eq!(child(&parent, 1).result(), Outcome::Skipped);
    }

    #[tokio::test]
    async fn runs_only_exclusive_tests_within_exclusive_suites() {
        let mut parent = Suite::new("Parent")
            .add(
                Suite::new("Child 1")
                    .with_options(Options::new().with_exclusive(true))
                    .add(pass("Test 1"))
                    .add(pass("Test 2").with_options(Options::new().with_exclusive(true))),
            )
            .add(Suite::new("Child 2").add(fail("Test 3")));
        parent.run(&mut NullReporter, &Options::new(), true).await;

        assert_eq!(parent.stats().passed, 1);
        assert_eq!(parent.stats().failed, 0);
        assert_eq!(parent.stats().skipped, 0);
    }

    #[tokio::test]
    async fn exclusive_mode_without_markers_runs_everything() {
        let mut suite = Suite::new("Test Suite").add(pass("Test 1")).add(fail("Test 2"));
        suite.run(&mut NullReporter, &Options::new(), true).await;

        assert_eq!(suite.stats(), stats(1, 1, 0));
    }

    #[tokio::test]
    async fn ignores_exclusive_markers_when_not_engaged() {
        let mut suite = Suite::new("Test Suite")
            .add(pass("Test 1"))
            .add(pass("Test 2").with_options(Options::new().with_exclusive(true)));
        suite.run(&mut NullReporter, &Options::new(), false).await;

        assert_eq!(suite.stats(), stats(2, 0, 0));
    }

    #[tokio::test]
    async fn skips_exclusive_tests() {
        let mut suite = Suite::new("Test Suite").add(pass("Test 1")).add(
            pass("Test 2").with_options(Options::new().with_skip(true).with_exclusive(true)),
        );
        suite.run(&mut NullReporter, &Options::new(), false).await;

        assert!(suite.passed());
        assert_eq!(child(&suite, 0).result(), Outcome::Passed);
        assert_eq!(child(&suite, 1).result(), Outcome::Skipped);
    }

    #[tokio::test]
    async fn skips_exclusive_suites() {
        let mut suite = Suite::new("Test Suite")
            .with_options(Options::new().with_skip(true).with_exclusive(true))
            .add(pass("Test 1"))
            .add(fail("Test 2"));
        suite.run(&mut NullReporter, &Options::new(), true).await;

        assert!(suite.skipped());
        assert_eq!(child(&suite, 0).result(), Outcome::Skipped);
        assert_eq!(child(&suite, 1).result(), Outcome::Skipped);
    }

    #[tokio::test]
    async fn supports_nesting() {
        let mut parent = Suite::new("Parent")
            .add(Suite::new("Child 1").add(pass("Test 1")).add(fail("Test 2")))
            .add(Suite::new("Child 2").add(pass("Test 3")));
        parent.run(&mut NullReporter, &Options::new(), false).await;

        assert!(!parent.passed());
        assert_eq!(parent.name(), "Parent");
        assert_eq!(parent.stats(), stats(2, 1, 0));

        let child1 = child(&parent, 0).as_suite().expect("suite");
        assert_eq!(child1.name(), "Child 1");
        assert!(!child1.passed());
        assert_eq!(child1.stats(), stats(1, 1, 0));

        let child2 = child(&parent, 1).as_suite().expect("suite");
        assert_eq!(child2.name(), "Child 2");
        assert!(child2.passed());
        assert_eq!(child2.stats(), stats(1, 0, 0));

        assert_eq!(child1.children()[0].name(), "Test 1");
        assert_eq!(child1.children()[0].result(), Outcome::Passed);
        assert_eq!(child1.children()[1].name(), "Test 2");
        assert_eq!(child1.children()[1].result(), Outcome::Failed);
        assert_eq!(child2.children()[0].name(), "Test 3");
        assert_eq!(child2.children()[0].result(), Outcome::Passed);
    }

    #[tokio::test]
    async fn rerun_resets_stats() {
        let mut suite = Suite::new("Test Suite").add(pass("Test 1")).add(fail("Test 2"));

        suite.run(&mut NullReporter, &Options::new(), false).await;
        suite.run(&mut NullReporter, &Options::new(), false).await;

        assert_eq!(suite.stats(), stats(1, 1, 0));
        assert_eq!(suite.stats().total(), suite.number_of_tests());
    }

    #[test]
    fn counts_tests_and_exclusive_markers() {
        let suite = Suite::new("Parent")
            .add(Suite::new("Child").add(pass("Test 1")).add(
                pass("Test 2").with_options(Options::new().with_exclusive(true)),
            ))
            .extend([pass("Test 3"), pass("Test 4")]);

        assert_eq!(suite.number_of_tests(), 4);
        assert!(suite.has_exclusive(&Options::new()));
        assert!(!suite.has_exclusive(&Options::new().with_exclusive(false)));
        assert!(!child(&suite, 1).has_exclusive(&Options::new()));
    }
}
