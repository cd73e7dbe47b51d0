//! Render use cases: console, markdown and GitHub annotations from in-memory reports.

use mfaguard_render::RenderableReport;

pub fn render_console(report: &RenderableReport) -> String {
    mfaguard_render::render_console(report)
}

pub fn render_markdown(report: &RenderableReport) -> String {
    mfaguard_render::render_markdown(report)
}

pub fn render_annotations(report: &RenderableReport, max: usize) -> Vec<String> {
    mfaguard_render::render_github_annotations(report)
        .into_iter()
        .take(max)
        .collect()
}
