//! Human-readable run summary.

use std::fmt::Write;

use kvconform_domain::report::{CaseResult, CaseStatus, StatusCounts};
use kvconform_domain::RunReport;

/// Renders one line per case, then the overall and per-tag counts.
///
/// Failures are shown with expected and actual values verbatim.
#[must_use]
pub fn render_console(report: &RunReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Suite: {}", report.suite);
    let _ = writeln!(out);

    for case in &report.cases {
        render_case(&mut out, case);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} ({:.1}% passed, {}ms)",
        counts_line(&report.summary),
        report.pass_rate(),
        report.duration_ms()
    );
    if !report.by_tag.is_empty() {
        let _ = writeln!(out, "By tag:");
        for (tag, counts) in &report.by_tag {
            let _ = writeln!(out, "  {tag}: {}", counts_line(counts));
        }
    }
    out
}

fn render_case(out: &mut String, case: &CaseResult) {
    let _ = write!(out, "[{:<7}] {}", case.status.label(), case.display_name);
    if case.status != CaseStatus::NotRun {
        let _ = write!(out, " ({}ms)", case.duration_ms);
    }
    let _ = writeln!(out);

    for failure in &case.failures {
        let _ = writeln!(out, "          {failure}");
    }
    if let Some(error) = &case.error {
        let _ = writeln!(out, "          {error}");
    }
    if let Some(reason) = &case.skipped_reason {
        let _ = writeln!(out, "          {reason}");
    }
    if case.status != CaseStatus::Passed
        && let Some(request) = &case.request
    {
        let _ = writeln!(out, "          request: {request}");
    }
}

fn counts_line(counts: &StatusCounts) -> String {
    format!(
        "{} total, {} passed, {} failed, {} errored, {} not run",
        counts.total, counts.passed, counts.failed, counts.errored, counts.not_run
    )
}
