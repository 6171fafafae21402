use colored::{control, Colorize};

use crate::core::models::cost::Report;

const SERVICE_COLUMN_WIDTH: usize = 30;
const RULE: &str = "=====================================";

/// Render the cost report as plain (or colored) text.
///
/// Layout:
/// ```text
/// AWS Costs for the last 30 days:
/// =====================================
/// Period: 2024-01-01 to 2024-01-31
///   Amazon EC2                    : 100.00 USD
///
/// ```
pub fn render_report(report: &Report, days: i64, use_color: bool) -> String {
    control::set_override(use_color);

    let mut lines: Vec<String> = Vec::new();
    lines.push(format!("AWS Costs for the last {} days:", days).bold().to_string());
    lines.push(RULE.to_string());

    if report.is_empty() {
        lines.push("No cost data found for the specified period.".to_string());
        return join_lines(lines);
    }

    for period in &report.periods {
        lines.push(format!(
            "{} {} to {}",
            "Period:".cyan(),
            period.start,
            period.end
        ));
        if period.service_costs.is_empty() {
            lines.push("  No service costs found for this period.".dimmed().to_string());
        } else {
            for cost in &period.service_costs {
                lines.push(format!(
                    "  {:<width$}: {} {}",
                    cost.service_name,
                    cost.amount,
                    cost.unit,
                    width = SERVICE_COLUMN_WIDTH
                ));
            }
        }
        lines.push(String::new());
    }

    join_lines(lines)
}

fn join_lines(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

/// One-line status for the notification channel. Carries no cost figures.
pub fn summarize(days: i64) -> String {
    format!("Successfully fetched costs for the last {} days.", days)
}

pub fn summarize_failure(days: i64, error: &anyhow::Error) -> String {
    format!("Failed to fetch costs for the last {} days: {:#}", days, error)
}

pub fn summarize_setup_failure(error: &anyhow::Error) -> String {
    format!("Cost report did not run: {:#}", error)
}
