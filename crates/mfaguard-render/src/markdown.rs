use crate::{RenderableReport, RenderableSeverity, format_ratio};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();
    let data = &report.data;

    out.push_str("# Mfaguard report\n\n");
    out.push_str(&format!(
        "- Verdict: **{}**\n- Accounts: {} scanned, {} violating\n- Compliance: {}\n- Findings: {} (emitted) / {} (total)\n\n",
        report.verdict.label(),
        data.accounts_scanned,
        data.violator_count,
        format_ratio(data.compliance_ratio),
        data.findings_emitted,
        data.findings_total
    ));

    if let Some(r) = &data.truncated_reason {
        out.push_str(&format!("> Note: {}\n\n", r));
    }

    if !data.rules.is_empty() {
        out.push_str("## Rules\n\n");
        out.push_str("| Check | Attribute | Bound | Violators |\n");
        out.push_str("|---|---|---:|---:|\n");
        for r in &data.rules {
            out.push_str(&format!(
                "| `{}` | `{}` | {} | {} |\n",
                r.check_id, r.attribute, r.accounts_bound, r.violator_count
            ));
        }
        out.push('\n');
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let sev = match f.severity {
            RenderableSeverity::Info => "INFO",
            RenderableSeverity::Warning => "WARN",
            RenderableSeverity::Error => "ERROR",
        };

        match &f.account {
            Some(account) => out.push_str(&format!(
                "- [{}] `{}` / `{}` on `{}`: {}\n",
                sev, f.check_id, f.code, account, f.message
            )),
            None => out.push_str(&format!(
                "- [{}] `{}` / `{}`: {}\n",
                sev, f.check_id, f.code, f.message
            )),
        }

        if let Some(help) = &f.help {
            out.push_str(&format!("  - help: {}\n", help));
        }
        if let Some(url) = &f.url {
            out.push_str(&format!("  - url: {}\n", url));
        }
    }

    out
}
