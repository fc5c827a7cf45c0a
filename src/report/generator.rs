//! Report generation.
//!
//! This module renders a degree summary as Markdown or JSON.

use crate::config::ReportConfig;
use crate::models::{CampusDegrees, DegreeSummary, Report, ReportMetadata, YearDegrees};
use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, options: &ReportConfig) -> String {
    let summary = &report.summary;
    let mut output = String::new();

    output.push_str("# UH Degree Awards Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_totals_section(summary));

    if !summary.years.is_empty() {
        output.push_str(&generate_years_section(&summary.years));
    }

    if options.include_campuses {
        output.push_str(&generate_campus_section(&summary.campuses));
    }

    if options.include_doctoral_programs {
        output.push_str(&generate_programs_section(
            &summary.doctoral_programs,
            options.max_programs,
        ));
    }

    output.push_str("---\n\n*Report generated by uhdegrees*\n");

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    if metadata.files_loaded > 1 {
        section.push_str(&format!("- **Files Loaded:** {}\n", metadata.files_loaded));
    }
    section.push_str(&format!("- **Records:** {}\n", metadata.record_count));
    section.push_str(&format!(
        "- **Duration:** {:.3}s\n\n",
        metadata.duration_seconds
    ));

    section
}

/// Generate the headline totals table.
fn generate_totals_section(summary: &DegreeSummary) -> String {
    let mut section = String::new();

    section.push_str("## Totals\n\n");
    section.push_str("| Statistic | Value |\n");
    section.push_str("|:---|---:|\n");
    section.push_str(&format!("| Total degrees | {} |\n", summary.total_degrees));
    section.push_str(&format!(
        "| Hawaiian legacy degrees | {} |\n",
        summary.hawaiian_degrees
    ));
    section.push_str(&format!(
        "| Hawaiian legacy share | {} |\n",
        format_percentage(summary.percentage_hawaiian)
    ));
    section.push_str(&format!(
        "| Most degrees in one year | {} |\n\n",
        summary
            .max_degrees_in_year
            .map(|max| max.to_string())
            .unwrap_or_else(|| "n/a".to_string())
    ));

    section
}

/// Generate the requested fiscal years table.
fn generate_years_section(years: &[YearDegrees]) -> String {
    let mut section = String::new();

    section.push_str("## Degrees by Fiscal Year\n\n");
    section.push_str("| Fiscal Year | Degrees |\n");
    section.push_str("|:---|---:|\n");

    for year in years {
        let label = match &year.fiscal_year {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        section.push_str(&format!("| {} | {} |\n", label, year.degrees));
    }
    section.push('\n');

    section
}

/// Generate the per-campus table.
fn generate_campus_section(campuses: &[CampusDegrees]) -> String {
    let mut section = String::new();

    section.push_str("## Degrees by Campus\n\n");

    if campuses.is_empty() {
        section.push_str("No campuses found in the dataset.\n\n");
        return section;
    }

    section.push_str("| Campus | Degrees |\n");
    section.push_str("|:---|---:|\n");
    for campus in campuses {
        section.push_str(&format!("| {} | {} |\n", campus.campus, campus.degrees));
    }
    section.push('\n');

    section
}

/// Generate the doctoral programs list.
fn generate_programs_section(programs: &[String], max_programs: usize) -> String {
    let mut section = String::new();

    section.push_str("## Doctoral Degree Programs\n\n");

    if programs.is_empty() {
        section.push_str("No doctoral degrees found in the dataset.\n\n");
        return section;
    }

    for program in programs.iter().take(max_programs) {
        section.push_str(&format!("- {}\n", program));
    }
    if programs.len() > max_programs {
        section.push_str(&format!(
            "- *... and {} more*\n",
            programs.len() - max_programs
        ));
    }
    section.push('\n');

    section
}

fn format_percentage(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value)
    } else {
        "n/a".to_string()
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Write rendered report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::json;
    use tempfile::TempDir;

    fn create_test_report() -> Report {
        Report {
            metadata: ReportMetadata {
                source: "uhdata.json".to_string(),
                generated_at: Utc::now(),
                files_loaded: 1,
                record_count: 4,
                duration_seconds: 0.01,
            },
            summary: DegreeSummary {
                record_count: 4,
                total_degrees: 256,
                hawaiian_degrees: 136,
                percentage_hawaiian: 53.125,
                max_degrees_in_year: Some(160),
                campuses: vec![
                    CampusDegrees {
                        campus: "Manoa".into(),
                        degrees: 200,
                    },
                    CampusDegrees {
                        campus: "Hilo".into(),
                        degrees: 56,
                    },
                ],
                years: vec![YearDegrees {
                    fiscal_year: json!(2012),
                    degrees: 160,
                }],
                doctoral_programs: vec!["Physics".to_string(), "Nursing".to_string()],
            },
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, &ReportConfig::default());

        assert!(markdown.contains("# UH Degree Awards Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("| Total degrees | 256 |"));
        assert!(markdown.contains("| Hawaiian legacy share | 53.1"));
        assert!(markdown.contains("| 2012 | 160 |"));
        assert!(markdown.contains("| Manoa | 200 |"));
        assert!(markdown.contains("- Nursing"));
    }

    #[test]
    fn test_markdown_respects_report_options() {
        let report = create_test_report();
        let options = ReportConfig {
            include_campuses: false,
            include_doctoral_programs: true,
            max_programs: 1,
        };
        let markdown = generate_markdown_report(&report, &options);

        assert!(!markdown.contains("## Degrees by Campus"));
        assert!(markdown.contains("- Physics"));
        assert!(!markdown.contains("- Nursing"));
        assert!(markdown.contains("and 1 more"));
    }

    #[test]
    fn test_totals_section_without_degrees() {
        let summary = DegreeSummary {
            percentage_hawaiian: f64::NAN,
            ..DegreeSummary::default()
        };
        let section = generate_totals_section(&summary);

        assert!(section.contains("| Hawaiian legacy share | n/a |"));
        assert!(section.contains("| Most degrees in one year | n/a |"));
    }

    #[test]
    fn test_years_section_labels() {
        let years = vec![
            YearDegrees {
                fiscal_year: json!("FY2012"),
                degrees: 3,
            },
            YearDegrees {
                fiscal_year: json!(2013),
                degrees: 4,
            },
        ];
        let section = generate_years_section(&years);

        assert!(section.contains("| FY2012 | 3 |"));
        assert!(section.contains("| 2013 | 4 |"));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"total_degrees\": 256"));
        assert!(json.contains("\"campuses\""));
        assert!(json.contains("\"generated_at\""));
    }

    #[test]
    fn test_json_report_nan_percentage_is_null() {
        let mut report = create_test_report();
        report.summary.percentage_hawaiian = f64::NAN;
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"percentage_hawaiian\": null"));
    }

    #[test]
    fn test_write_report() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("degrees.md");

        write_report("# UH Degree Awards Report\n", &path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "# UH Degree Awards Report\n"
        );
    }
}
