use crate::{RenderableReport, RenderableVerdictStatus, format_ratio};
use std::fmt::Write;

/// Render the human-readable console report.
///
/// The violator list is taken from the report data, so it is complete even when the
/// findings list was truncated.
pub fn render_console(report: &RenderableReport) -> String {
    let mut out = String::new();
    let data = &report.data;

    if report.verdict == RenderableVerdictStatus::Inconclusive {
        out.push_str("POLICY CHECK INCONCLUSIVE\n");
        for f in &report.findings {
            let _ = writeln!(out, "  {}", f.message);
        }
        let _ = write!(out, "\nVerdict: {}\n", report.verdict.label());
        return out;
    }

    let _ = write!(out, "Analyzed {} accounts\n\n", data.accounts_scanned);

    if data.violators.is_empty() {
        out.push_str("POLICY SATISFIED\n");
        out.push_str("All accounts compliant!\n");
    } else {
        out.push_str("POLICY VIOLATION!\n");
        out.push_str("Violating accounts:\n");
        for name in &data.violators {
            let _ = writeln!(out, "  → {name}");
        }
    }

    let _ = write!(
        out,
        "\nCompliance: {}\nViolations: {}/{} users\n",
        format_ratio(data.compliance_ratio),
        data.violator_count,
        data.accounts_scanned
    );
    let _ = writeln!(out, "Verdict: {}", report.verdict.label());
    out
}
