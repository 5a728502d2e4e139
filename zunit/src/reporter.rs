use console::{style, Term};
use eyre::WrapErr;
use zunit_core::{Outcome, Reporter, ResultGraph, Suite, Test};

/// Prints one line per finished test, indented by suite depth, and a summary line
/// once the harness has finished.
pub struct ListReporter {
    terminal: Term,
    depth: usize,
}

impl Default for ListReporter {
    fn default() -> ListReporter {
        ListReporter::new()
    }
}

impl ListReporter {
    pub fn new() -> ListReporter {
        ListReporter {
            terminal: Term::stdout(),
            depth: 0,
        }
    }

    fn write(&self, depth: usize, line: impl AsRef<str>) -> eyre::Result<()> {
        self.terminal
            .write_line(&format!("{}{}", "  ".repeat(depth), line.as_ref()))
            .wrap_err("failed to write line on terminal")
    }
}

fn test_line(test: &Test) -> String {
    let number = test
        .number()
        .map(|number| format!("{number}. "))
        .unwrap_or_default();
    match (test.result(), test.error()) {
        (Outcome::Passed, _) => format!("{} {number}{}", style("✓").green(), test.name()),
        (Outcome::Failed, Some(e)) => {
            format!("{} {number}{}: {e}", style("✘").red(), test.name())
        }
        (Outcome::Failed, None) => format!("{} {number}{}", style("✘").red(), test.name()),
        _ => format!("{}", style(format!("- {number}{}", test.name())).dim()),
    }
}

fn summary_line(graph: &ResultGraph) -> String {
    let stats = graph.stats();
    let mut line = format!(
        "{} passed, {} failed, {} skipped",
        stats.passed, stats.failed, stats.skipped
    );
    if stats.excluded > 0 {
        line.push_str(&format!(", {} excluded", stats.excluded));
    }
    match graph.result() {
        Outcome::Failed => format!("{}", style(line).red()),
        _ => format!("{}", style(line).green()),
    }
}

#[async_trait::async_trait]
impl Reporter for ListReporter {
    async fn on_started(&mut self, number_of_tests: usize) -> eyre::Result<()> {
        self.depth = 0;
        self.write(0, format!("running {number_of_tests} tests"))
    }

    async fn on_suite_start(&mut self, suite: &Suite) -> eyre::Result<()> {
        self.write(self.depth, style(suite.name()).bold().to_string())?;
        self.depth += 1;
        Ok(())
    }

    async fn on_suite_end(&mut self, _suite: &Suite) -> eyre::Result<()> {
        self.depth = self.depth.saturating_sub(1);
        Ok(())
    }

    async fn on_test_end(&mut self, test: &Test) -> eyre::Result<()> {
        self.write(self.depth, test_line(test))
    }

    async fn on_finished(&mut self, graph: &ResultGraph) -> eyre::Result<()> {
        self.write(0, summary_line(graph))
    }
}
