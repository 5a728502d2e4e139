//! Finalisation.
//!
//! A definition tree of tests and suites is reusable: it can be run any number of
//! times. [`Runnable::finalise`] turns it into a one-shot execution plan by deep
//! copying it in pre-order and binding every copied node to an execution number.
//! Runs of the copy write only to the copy, so the definition tree keeps its
//! pre-run state.
//!
//! ```text
//! definition tree                 finalised copy
//! +-------------------+           +-------------------+
//! | Parent            |           | #1 Parent         |
//! |   Child 1         | finalise  |   #2 Child 1      |
//! |     Test 1        | --------> |     #3 Test 1     |
//! |   Child 2         |           |   #4 Child 2      |
//! |     Test 2        |           |     #5 Test 2     |
//! +-------------------+           +-------------------+
//! ```

use crate::{
    graph::Resolve,
    options::Options,
    reporter::Reporter,
    runnable::{Runnable, Status},
    Result,
};

/// A numbered copy of a runnable tree.
#[derive(Debug, Clone)]
pub struct Finalised {
    root: Runnable,
}

impl Finalised {
    pub(crate) fn new(root: Runnable) -> Finalised {
        Finalised { root }
    }

    pub fn root(&self) -> &Runnable {
        &self.root
    }

    pub fn name(&self) -> &str {
        self.root.name()
    }

    pub fn number(&self) -> Option<usize> {
        self.root.number()
    }

    pub fn status(&self) -> &Status {
        self.root.status()
    }

    pub fn number_of_tests(&self) -> usize {
        self.root.number_of_tests()
    }

    /// Whether any node carries an exclusive marker once `runtime` is layered over
    /// its own options.
    pub fn has_exclusive(&self, runtime: &Options) -> bool {
        self.root.has_exclusive(runtime)
    }

    pub fn resolve(&self, path: &[usize]) -> Result<&Runnable> {
        self.root.resolve(path)
    }

    pub async fn run(&mut self, reporter: &mut dyn Reporter, runtime: &Options, exclusive: bool) {
        self.root.run(reporter, runtime, exclusive).await
    }
}
