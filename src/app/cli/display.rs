//! CLI display utilities for the scan report

use crate::scanner::types::ScanResult;
use colored::Colorize;
use strum_macros::{Display, EnumString};

/// How the final report is printed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

const REPORT_TITLE: &str = "=== Scan Report ===";

/// Render the report as text or pretty-printed JSON
pub fn render_report(
    result: &ScanResult,
    format: ReportFormat,
    use_color: bool,
) -> Result<String, serde_json::Error> {
    match format {
        ReportFormat::Json => serde_json::to_string_pretty(result),
        ReportFormat::Text => Ok(render_text(result, use_color)),
    }
}

fn render_text(result: &ScanResult, use_color: bool) -> String {
    let malware = result.malware_files.to_string();
    let errors = result.errors.to_string();
    let (title, malware, errors) = if use_color {
        let malware = if result.malware_files > 0 {
            malware.red().bold().to_string()
        } else {
            malware.green().to_string()
        };
        let errors = if result.errors > 0 {
            errors.yellow().to_string()
        } else {
            errors
        };
        (REPORT_TITLE.cyan().bold().to_string(), malware, errors)
    } else {
        (REPORT_TITLE.to_string(), malware, errors)
    };

    let mut lines = vec![
        title,
        format!("Total files processed: {}", result.total_files),
        format!("Malware files found: {}", malware),
        format!("Errors: {}", errors),
    ];
    if result.errors > 0 {
        lines.push(format!(
            "  traversal: {}, digest: {}",
            result.traversal_errors, result.digest_errors
        ));
    }
    if result.log_write_errors > 0 {
        lines.push(format!("Match log write failures: {}", result.log_write_errors));
    }
    lines.push(format!("Time elapsed: {:.3} seconds", result.duration));
    lines.join("\n")
}

/// Print the report to stdout
pub fn print_report(
    result: &ScanResult,
    format: ReportFormat,
    use_color: bool,
) -> Result<(), serde_json::Error> {
    let rendered = render_report(result, format, use_color)?;
    println!();
    println!("{}", rendered);
    Ok(())
}
