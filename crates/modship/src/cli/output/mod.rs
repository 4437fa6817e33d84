//! Terminal output for release runs
//!
//! Progress markers go to stdout, errors and lint violations to stderr.
//! Colors follow the terminal each stream is attached to.

use console::{style, Style};

use modship_core::StageOutcome;
use modship_lint::Violation;

/// Column the summary values start at
const LABEL_WIDTH: usize = 14;

pub fn success(message: &str) {
    println!("{} {}", style("✓").green().bold(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", style("✗").for_stderr().red().bold(), message);
}

pub fn warning(message: &str) {
    println!("{} {}", style("!").yellow().bold(), message);
}

pub fn info(message: &str) {
    println!("{} {}", style("→").blue(), message);
}

/// Print an action that a simulated run would have performed
pub fn simulate(message: &str) {
    println!("{} {}", style("[simulate]").magenta().bold(), message);
}

/// Print one lint finding as `[CATEGORY] path:line - message (match)`
pub fn violation(violation: &Violation) {
    let mut line = format!(
        "{} {}:{} - {}",
        style(format!("[{}]", violation.category))
            .for_stderr()
            .red(),
        path_style()
            .for_stderr()
            .apply_to(violation.file.display()),
        violation.line,
        violation.message
    );
    if !violation.matched.is_empty() {
        line.push_str(&format!(
            " {}",
            style(format!("({})", violation.matched)).for_stderr().dim()
        ));
    }
    eprintln!("{} {}", style("✗").for_stderr().red().bold(), line);
}

/// Bold title over a rule of the same width
pub fn header(text: &str) -> String {
    format!(
        "{}\n{}",
        style(text).bold(),
        style("─".repeat(text.chars().count())).dim()
    )
}

/// Indented `label: value` line with values aligned in one column
pub fn key_value(key: &str, value: &str) -> String {
    let label = format!("{}:", key);
    format!(
        "  {} {}",
        style(format!("{:<width$}", label, width = LABEL_WIDTH)).dim(),
        value
    )
}

/// Stage outcome colored by how it went
pub fn outcome(outcome: &StageOutcome) -> String {
    let text = outcome.to_string();
    match outcome {
        StageOutcome::Done => style(text).green().to_string(),
        StageOutcome::Simulated => style(text).magenta().to_string(),
        StageOutcome::Skipped(_) => style(text).dim().to_string(),
        StageOutcome::Failed(_) => style(text).red().to_string(),
    }
}

pub fn version_style() -> Style {
    Style::new().green().bold()
}

pub fn tag_style() -> Style {
    Style::new().yellow()
}

pub fn path_style() -> Style {
    Style::new().cyan()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_aligns_values() {
        console::set_colors_enabled(false);
        assert_eq!(key_value("Tag", "v1.2.4"), "  Tag:           v1.2.4");
        assert_eq!(key_value("Registration", "done"), "  Registration:  done");
    }

    #[test]
    fn test_header_rule_matches_title() {
        console::set_colors_enabled(false);
        assert_eq!(header("Release Summary"), "Release Summary\n───────────────");
    }

    #[test]
    fn test_outcome_text() {
        console::set_colors_enabled(false);
        assert_eq!(
            outcome(&StageOutcome::Skipped("--no-git".to_string())),
            "skipped (--no-git)"
        );
        assert_eq!(outcome(&StageOutcome::Done), "done");
    }
}
