//! Result graph.
//!
//! The numbered tree of outcomes produced by a run, assembled by
//! [`GraphReporter`](crate::reporter::GraphReporter) from lifecycle notifications.
//! Nodes are addressed by coordinates: `resolve(&[1, 0])` is the first child of the
//! second child of the root.

use serde::Serialize;
use std::time::Duration;

use crate::{
    runnable::{Outcome, Stats},
    suite::Suite,
    test::{Failure, Test},
    Error, Result,
};

/// Coordinate lookup over a tree.
pub trait Resolve: Sized {
    fn children(&self) -> &[Self];

    /// Descend into child `path[0]`, then `path[1]`, and so on. An empty path
    /// resolves to `self`.
    fn resolve(&self, path: &[usize]) -> Result<&Self> {
        path.iter()
            .enumerate()
            .try_fold(self, |node, (depth, &index)| {
                node.children().get(index).ok_or_else(|| Error::Lookup {
                    path: path.to_vec(),
                    depth,
                    index,
                })
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Test,
    Suite,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultNode {
    pub kind: Kind,
    pub name: String,
    pub number: Option<usize>,
    pub result: Outcome,
    pub error: Option<Failure>,
    #[serde(with = "humantime_serde")]
    pub duration: Option<Duration>,
    pub stats: Stats,
    pub children: Vec<ResultNode>,
}

impl ResultNode {
    pub(crate) fn from_test(test: &Test) -> ResultNode {
        ResultNode {
            kind: Kind::Test,
            name: test.name().to_string(),
            number: test.number(),
            result: test.result(),
            error: test.error().cloned(),
            duration: test.duration(),
            stats: Stats::of(test.result()),
            children: Vec::new(),
        }
    }

    pub(crate) fn from_suite(suite: &Suite) -> ResultNode {
        ResultNode {
            kind: Kind::Suite,
            name: suite.name().to_string(),
            number: suite.number(),
            result: suite.result(),
            error: None,
            duration: suite.duration(),
            stats: suite.stats(),
            children: Vec::new(),
        }
    }

    /// Refresh the outcome of a suite node once the suite has ended.
    pub(crate) fn complete(&mut self, suite: &Suite) {
        self.result = suite.result();
        self.duration = suite.duration();
        self.stats = suite.stats();
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

impl Resolve for ResultNode {
    fn children(&self) -> &[ResultNode] {
        &self.children
    }
}

/// Completed result graph of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResultGraph {
    root: ResultNode,
}

impl ResultGraph {
    pub(crate) fn new(root: ResultNode) -> ResultGraph {
        ResultGraph { root }
    }

    pub fn root(&self) -> &ResultNode {
        &self.root
    }

    pub fn name(&self) -> &str {
        &self.root.name
    }

    pub fn result(&self) -> Outcome {
        self.root.result
    }

    pub fn stats(&self) -> Stats {
        self.root.stats
    }

    pub fn resolve(&self, path: &[usize]) -> Result<&ResultNode> {
        self.root.resolve(path)
    }

    /// Every node in pre-order, which is also execution-number order.
    pub fn nodes(&self) -> Vec<&ResultNode> {
        fn walk<'a>(node: &'a ResultNode, nodes: &mut Vec<&'a ResultNode>) {
            nodes.push(node);
            for child in &node.children {
                walk(child, nodes);
            }
        }
        let mut nodes = Vec::new();
        walk(&self.root, &mut nodes);
        nodes
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
