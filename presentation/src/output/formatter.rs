//! Output formatter trait

use flowgrid_domain::GenerationResult;

/// Trait for formatting generation results
pub trait OutputFormatter {
    /// Reply text, diagram and status
    fn format(&self, result: &GenerationResult) -> String;

    /// Format as JSON
    fn format_json(&self, result: &GenerationResult) -> String;

    /// Diagram code only
    fn format_diagram_only(&self, result: &GenerationResult) -> String;
}
