//! Rendering utilities for human and CI surfaces (console, Markdown, GitHub annotations).

#![forbid(unsafe_code)]

mod gha;
mod markdown;
mod model;
mod text;

pub use gha::render_github_annotations;
pub use markdown::render_markdown;
pub use model::{
    RenderableData, RenderableFinding, RenderableReport, RenderableRule, RenderableSeverity,
    RenderableVerdictStatus,
};
pub use text::render_console;

/// One decimal place, or `n/a` when no verdict was reached.
pub(crate) fn format_ratio(ratio: Option<f64>) -> String {
    match ratio {
        Some(r) => format!("{r:.1}%"),
        None => "n/a".to_string(),
    }
}
