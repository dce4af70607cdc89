//! Display formatting for CLI output

use console::style;
use kubeship_kube::{EntityAction, OperationSummary};

/// Print one line per entity, then the totals
pub fn print_summary(action: EntityAction, summary: &OperationSummary) {
    for entity in &summary.succeeded {
        println!("  {} {}", style("✓").green(), entity);
    }
    for (entity, error) in &summary.failed {
        println!("  {} {}: {}", style("✗").red(), entity, style(error).dim());
    }
    for (entry, reason) in &summary.skipped {
        println!("  {} {} ({})", style("-").dim(), entry, style(reason).dim());
    }

    let headline = format!("{}: {}", capitalize(&action.to_string()), summary.summary());
    if summary.is_success() {
        println!("\n{} {}", style("✓").green().bold(), headline);
    } else {
        println!("\n{} {}", style("✗").red().bold(), headline);
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("create"), "Create");
        assert_eq!(capitalize(""), "");
    }
}
