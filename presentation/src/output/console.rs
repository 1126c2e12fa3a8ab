//! Console output formatter for generated turns

use crate::cli::commands::OutputFormat;
use crate::output::formatter::OutputFormatter;
use colored::Colorize;
use flowgrid_domain::{DiagramStatus, GenerationResult, MERMAID_FENCE_TAG};

/// Formats generation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format according to the selected output mode
    pub fn render(result: &GenerationResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Text => Self::format(result),
            OutputFormat::Json => Self::format_json(result),
            OutputFormat::Diagram => Self::format_diagram_only(result),
        }
    }

    /// Reply, diagram and status for humans
    pub fn format(result: &GenerationResult) -> String {
        let mut output = String::new();

        output.push_str(&result.reply_text);
        output.push('\n');

        if result.has_diagram() {
            output.push_str(&Self::section_header("Diagram"));
            output.push_str(&format!(
                "{}\n{}\n{}\n",
                format!("```{}", MERMAID_FENCE_TAG).dimmed(),
                result.diagram_text,
                "```".dimmed()
            ));
        }

        output.push_str(&Self::status_line(result));
        output.push('\n');

        if let Some(error) = &result.syntax_error {
            output.push_str(&format!(
                "{}\n{}\n",
                "Last syntax error:".red().bold(),
                Self::indent(error, "  ")
            ));
        }

        output
    }

    /// Format as JSON
    pub fn format_json(result: &GenerationResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Diagram code only; empty when the turn produced none
    pub fn format_diagram_only(result: &GenerationResult) -> String {
        result.diagram_text.clone()
    }

    fn status_line(result: &GenerationResult) -> String {
        let attempts = format!(
            "({} model call{})",
            result.attempts,
            if result.attempts == 1 { "" } else { "s" }
        );
        let status = match result.status {
            DiagramStatus::Valid => "v diagram validated".green().to_string(),
            DiagramStatus::Unvalidated => "- diagram not validated".yellow().to_string(),
            DiagramStatus::Exhausted => "x diagram still invalid after repairs".red().to_string(),
            DiagramStatus::Absent => "- no diagram in this reply".dimmed().to_string(),
        };
        format!("{} {}", status, attempts.dimmed())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format(&self, result: &GenerationResult) -> String {
        Self::format(result)
    }

    fn format_json(&self, result: &GenerationResult) -> String {
        Self::format_json(result)
    }

    fn format_diagram_only(&self, result: &GenerationResult) -> String {
        Self::format_diagram_only(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exhausted() -> GenerationResult {
        GenerationResult::assemble(
            "Here is the flow.\n```mermaid\ngraph TD\n  A-->\n```",
            "graph TD\n  A-->",
            DiagramStatus::Exhausted,
            Some("Parse error on line 2:\nExpecting 'NODE_STRING'".to_string()),
            3,
        )
    }

    #[test]
    fn test_text_output_shows_reply_diagram_and_error() {
        colored::control::set_override(false);
        let text = ConsoleFormatter::render(&exhausted(), OutputFormat::Text);

        assert!(text.starts_with("Here is the flow."));
        assert!(text.contains("```mermaid\ngraph TD\n  A-->\n```"));
        assert!(text.contains("still invalid"));
        assert!(text.contains("(3 model calls)"));
        assert!(text.contains("  Parse error on line 2:\n  Expecting 'NODE_STRING'"));
    }

    #[test]
    fn test_json_output_uses_wire_names() {
        let json = ConsoleFormatter::render(&exhausted(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["diagramText"], "graph TD\n  A-->");
        assert_eq!(value["replyText"], "Here is the flow.");
        assert_eq!(value["status"], "exhausted");
        assert_eq!(value["attempts"], 3);
    }

    #[test]
    fn test_diagram_output_is_bare_code() {
        assert_eq!(
            ConsoleFormatter::render(&exhausted(), OutputFormat::Diagram),
            "graph TD\n  A-->"
        );

        let clarifying = GenerationResult::assemble(
            "Which steps should the flow include?",
            "",
            DiagramStatus::Absent,
            None,
            1,
        );
        assert_eq!(
            ConsoleFormatter::render(&clarifying, OutputFormat::Diagram),
            ""
        );
    }
}
