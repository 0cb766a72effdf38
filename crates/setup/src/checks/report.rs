//! Check results, their aggregation, and where their output goes.

use crate::console::Console;

/// Outcome of a single pre-flight probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub detail: Option<String>,
}

impl CheckResult {
    pub fn pass(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: None,
        }
    }

    pub fn pass_with(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            detail: Some(detail.into()),
        }
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: false,
            detail: Some(detail.into()),
        }
    }
}

/// Destination for check output. The CLI styles lines onto the terminal;
/// tests capture them in a buffer instead.
pub trait StatusSink {
    fn section(&mut self, title: &str);
    fn status(&mut self, result: &CheckResult);
    /// Informational line that is not part of the pass count.
    fn note(&mut self, text: &str);
}

/// Terminal sink.
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn section(&mut self, title: &str) {
        Console::section(title);
    }

    fn status(&mut self, result: &CheckResult) {
        Console::check_line(&result.name, result.passed, result.detail.as_deref());
    }

    fn note(&mut self, text: &str) {
        Console::warning(text);
    }
}

/// Capturing sink for tests.
#[derive(Debug, Default)]
pub struct BufferSink {
    pub lines: Vec<String>,
}

impl StatusSink for BufferSink {
    fn section(&mut self, title: &str) {
        self.lines.push(format!("== {title} =="));
    }

    fn status(&mut self, result: &CheckResult) {
        let status = if result.passed { "PASS" } else { "FAIL" };
        let detail = result.detail.as_deref().unwrap_or("");
        self.lines.push(format!("{} {status} {detail}", result.name));
    }

    fn note(&mut self, text: &str) {
        self.lines.push(format!("note: {text}"));
    }
}

/// Every probe's result, keyed by name. Probes never abort each other; the
/// report only ever grows.
#[derive(Debug, Default)]
pub struct CheckReport {
    results: Vec<CheckResult>,
}

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the result through the sink and record it.
    pub fn record(&mut self, sink: &mut dyn StatusSink, result: CheckResult) -> bool {
        sink.status(&result);
        let passed = result.passed;
        self.results.push(result);
        passed
    }

    pub fn passed(&self) -> usize {
        self.results.iter().filter(|r| r.passed).count()
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|r| r.passed)
    }

    pub fn get(&self, name: &str) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.name == name)
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts() {
        let mut sink = BufferSink::default();
        let mut report = CheckReport::new();

        assert!(report.record(&mut sink, CheckResult::pass("A")));
        assert!(!report.record(&mut sink, CheckResult::fail("B", "broken")));
        report.record(&mut sink, CheckResult::pass_with("C", "fine"));

        assert_eq!(report.passed(), 2);
        assert_eq!(report.total(), 3);
        assert!(!report.all_passed());
        assert!(report.get("B").is_some());
        assert!(report.get("missing").is_none());
    }

    #[test]
    fn test_buffer_sink_captures_lines() {
        let mut sink = BufferSink::default();
        sink.section("Checks");
        sink.status(&CheckResult::fail("Port 16111", "already in use"));
        sink.note("heads up");

        assert_eq!(
            sink.lines,
            vec![
                "== Checks ==".to_string(),
                "Port 16111 FAIL already in use".to_string(),
                "note: heads up".to_string(),
            ]
        );
    }
}
