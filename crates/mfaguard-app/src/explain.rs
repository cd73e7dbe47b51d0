//! The `explain` use case: look up check/code documentation.

use mfaguard_types::explain::{self, Explanation};

#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Found(Explanation),
    /// Unknown identifier; carries what is available so the CLI can suggest.
    NotFound {
        identifier: String,
        available_check_ids: &'static [&'static str],
        available_codes: &'static [&'static str],
    },
}

/// Look up an explanation for a check_id or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    match explain::lookup_explanation(identifier) {
        Some(exp) => ExplainOutput::Found(exp),
        None => ExplainOutput::NotFound {
            identifier: identifier.to_string(),
            available_check_ids: explain::all_check_ids(),
            available_codes: explain::all_codes(),
        },
    }
}

/// Format an explanation for terminal display.
pub fn format_explanation(exp: &Explanation) -> String {
    let mut out = String::new();

    push_heading(&mut out, exp.title, '=');
    out.push_str(exp.description);
    out.push_str("\n\n");

    push_heading(&mut out, "Remediation", '-');
    out.push_str(exp.remediation);
    out.push_str("\n\n");

    push_heading(&mut out, "Example", '-');
    out.push_str("Violating:\n    ");
    out.push_str(exp.examples.before);
    out.push_str("\n\nCompliant:\n    ");
    out.push_str(exp.examples.after);
    out.push('\n');

    out
}

fn push_heading(out: &mut String, title: &str, underline: char) {
    out.push_str(title);
    out.push('\n');
    out.extend(std::iter::repeat_n(underline, title.chars().count()));
    out.push_str("\n\n");
}

/// Format the "not found" message, listing every known identifier.
pub fn format_not_found(identifier: &str, check_ids: &[&str], codes: &[&str]) -> String {
    let mut out = format!("Unknown check_id or code: {identifier}\n\n");
    for (label, items) in [("check_ids", check_ids), ("codes", codes)] {
        out.push_str(&format!("Known {label}:\n"));
        for item in items {
            out.push_str(&format!("  {item}\n"));
        }
    }
    out
}
