use tracing::*;

use crate::{
    graph::{ResultGraph, ResultNode},
    suite::Suite,
    test::Test,
    Error, Result,
};

/// Reporter trait. Implement the on_xxx hooks you are interested in; the rest
/// default to no-ops.
///
/// Notifications arrive depth-first, left to right. A suite's end notification
/// always follows the end notifications of all of its children. A hook returning
/// an error is logged and does not interrupt the run.
#[async_trait::async_trait]
pub trait Reporter: Send {
    /// Called by the harness before the run begins.
    async fn on_started(&mut self, _number_of_tests: usize) -> eyre::Result<()> {
        Ok(())
    }

    /// Called when a suite starts, before any of its children.
    async fn on_suite_start(&mut self, _suite: &Suite) -> eyre::Result<()> {
        Ok(())
    }

    /// Called when a suite ends with its final result and stats.
    async fn on_suite_end(&mut self, _suite: &Suite) -> eyre::Result<()> {
        Ok(())
    }

    /// Called when a test starts.
    async fn on_test_start(&mut self, _test: &Test) -> eyre::Result<()> {
        Ok(())
    }

    /// Called when a test ends with its final result.
    async fn on_test_end(&mut self, _test: &Test) -> eyre::Result<()> {
        Ok(())
    }

    /// Called by the harness once the result graph is complete.
    async fn on_finished(&mut self, _graph: &ResultGraph) -> eyre::Result<()> {
        Ok(())
    }
}

pub(crate) fn notify(hook: &str, name: &str, result: eyre::Result<()>) {
    if let Err(e) = result {
        error!("reporter failed on {hook} of \"{name}\": {e:#}");
    }
}

pub struct NullReporter;

#[async_trait::async_trait]
impl Reporter for NullReporter {}

/// Dispatches every notification to each attached reporter, in attachment order.
/// A failing reporter is logged and the remaining reporters are still notified.
#[derive(Default)]
pub struct MultiReporter<'a> {
    reporters: Vec<&'a mut dyn Reporter>,
}

impl<'a> MultiReporter<'a> {
    pub fn new() -> MultiReporter<'a> {
        MultiReporter {
            reporters: Vec::new(),
        }
    }

    pub fn add(mut self, reporter: &'a mut dyn Reporter) -> MultiReporter<'a> {
        self.reporters.push(reporter);
        self
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

#[async_trait::async_trait]
impl<'a> Reporter for MultiReporter<'a> {
    async fn on_started(&mut self, number_of_tests: usize) -> eyre::Result<()> {
        for reporter in &mut self.reporters {
            notify("start", "harness", reporter.on_started(number_of_tests).await);
        }
        Ok(())
    }

    async fn on_suite_start(&mut self, suite: &Suite) -> eyre::Result<()> {
        for reporter in &mut self.reporters {
            notify("suite start", suite.name(), reporter.on_suite_start(suite).await);
        }
        Ok(())
    }

    async fn on_suite_end(&mut self, suite: &Suite) -> eyre::Result<()> {
        for reporter in &mut self.reporters {
            notify("suite end", suite.name(), reporter.on_suite_end(suite).await);
        }
        Ok(())
    }

    async fn on_test_start(&mut self, test: &Test) -> eyre::Result<()> {
        for reporter in &mut self.reporters {
            notify("test start", test.name(), reporter.on_test_start(test).await);
        }
        Ok(())
    }

    async fn on_test_end(&mut self, test: &Test) -> eyre::Result<()> {
        for reporter in &mut self.reporters {
            notify("test end", test.name(), reporter.on_test_end(test).await);
        }
        Ok(())
    }

    async fn on_finished(&mut self, graph: &ResultGraph) -> eyre::Result<()> {
        for reporter in &mut self.reporters {
            notify("finish", graph.name(), reporter.on_finished(graph).await);
        }
        Ok(())
    }
}

/// Assembles the numbered result graph from suite and test notifications.
#[derive(Debug, Default)]
pub struct GraphReporter {
    stack: Vec<ResultNode>,
    root: Option<ResultNode>,
}

impl GraphReporter {
    pub fn new() -> GraphReporter {
        GraphReporter::default()
    }

    fn attach(&mut self, node: ResultNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root = Some(node),
        }
    }

    /// Snapshot of the graph recorded so far.
    pub fn to_graph(&self) -> Result<ResultGraph> {
        self.root
            .clone()
            .map(ResultGraph::new)
            .ok_or(Error::EmptyGraph)
    }

    pub fn into_graph(self) -> Result<ResultGraph> {
        self.root.map(ResultGraph::new).ok_or(Error::EmptyGraph)
    }
}

#[async_trait::async_trait]
impl Reporter for GraphReporter {
    async fn on_suite_start(&mut self, suite: &Suite) -> eyre::Result<()> {
        if self.stack.is_empty() {
            self.root = None;
        }
        self.stack.push(ResultNode::from_suite(suite));
        Ok(())
    }

    async fn on_suite_end(&mut self, suite: &Suite) -> eyre::Result<()> {
        let Some(mut node) = self.stack.pop() else {
            eyre::bail!("suite \"{}\" ended without having started", suite.name());
        };
        node.complete(suite);
        self.attach(node);
        Ok(())
    }

    async fn on_test_end(&mut self, test: &Test) -> eyre::Result<()> {
        self.attach(ResultNode::from_test(test));
        Ok(())
    }
}
