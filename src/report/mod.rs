// SPDX-License-Identifier: PMPL-1.0-or-later
//! Report generation for validation results.
//!
//! Supports multiple output formats:
//! - Text: per-file progress and messages, detail driven by verbosity
//! - JSON: `[file, results]` pairs with outcomes nested by guideline and technique
//! - Flat JSON: the same pairs with each outcome kind as a flat list
//! - SARIF: Static Analysis Results Interchange Format for IDE/CI integration

use crate::config::WcagLevel;
use crate::results::OutcomeKind;
use crate::scanner::FileReport;
use colored::Colorize;
use serde::Serialize;

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// Nested JSON
    Json,
    /// Flat JSON lists
    FlatJson,
    /// SARIF for IDE/CI integration
    Sarif,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::FlatJson => write!(f, "flat-json"),
            OutputFormat::Sarif => write!(f, "sarif"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "flat-json" | "flat_json" => Ok(OutputFormat::FlatJson),
            "sarif" => Ok(OutputFormat::Sarif),
            other => Err(format!("Unknown output format: {}", other)),
        }
    }
}

/// Settings that shape the text report
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    pub level: WcagLevel,
    pub verbosity: u8,
    /// Files with only warnings are reported as failed
    pub warnings_as_errors: bool,
}

/// Generate a report for a batch of files
pub fn generate_report(reports: &[FileReport], format: OutputFormat, options: ReportOptions) -> String {
    match format {
        OutputFormat::Text => generate_text_report(reports, options),
        OutputFormat::Json => generate_json_report(reports, false),
        OutputFormat::FlatJson => generate_json_report(reports, true),
        OutputFormat::Sarif => generate_sarif_report(reports),
    }
}

fn push_line(output: &mut String, line: &str) {
    output.push_str(line);
    output.push('\n');
}

/// Generate human-readable text report
fn generate_text_report(reports: &[FileReport], options: ReportOptions) -> String {
    let verbosity = options.verbosity;
    let mut output = String::new();

    for report in reports {
        let results = &report.results;

        if verbosity > 0 {
            output.push_str(&format!("Starting - {} ... ", report.file));
            if verbosity == 1 {
                if report.is_failure(options.warnings_as_errors) {
                    push_line(&mut output, &"failed".red().bold().to_string());
                } else {
                    push_line(&mut output, &"ok".green().bold().to_string());
                }
            } else {
                output.push('\n');
            }
        }

        if let Some(ref error) = report.error {
            push_line(&mut output, &format!("ERROR - could not validate {}: {}", report.file, error));
            continue;
        }

        if verbosity > 1 {
            for outcome in results.outcomes(OutcomeKind::Failure) {
                push_line(&mut output, &format!("{} - {}", OutcomeKind::Failure, outcome.message_text()));
            }
        }
        if verbosity > 2 {
            for kind in [OutcomeKind::Warning, OutcomeKind::Skipped] {
                for outcome in results.outcomes(kind) {
                    push_line(&mut output, &format!("{} - {}", kind, outcome.message_text()));
                }
            }
        }

        if verbosity > 1 {
            push_line(&mut output, &format!("Finished - {}", report.file));
            push_line(&mut output, &format!("         - {} failed", results.failure_count()));
            push_line(&mut output, &format!("         - {} warnings", results.warning_count()));
            push_line(
                &mut output,
                &format!("         - {} succeeded", results.count(OutcomeKind::Success)),
            );
            push_line(
                &mut output,
                &format!("         - {} skipped", results.count(OutcomeKind::Skipped)),
            );
        }
    }

    let errors: usize = reports
        .iter()
        .map(|r| r.results.failure_count() + usize::from(r.error.is_some()))
        .sum();
    let warnings: usize = reports.iter().map(|r| r.results.warning_count()).sum();

    push_line(&mut output, &format!("Tested at WCAG2.0 {} Level", options.level));
    output.push_str(&format!(
        "{} errors, {} warnings in {} files",
        errors,
        warnings,
        reports.len()
    ));

    output
}

/// Serialize one file's results, adding its error if it has one
fn file_entry<T: Serialize>(report: &FileReport, results: T) -> serde_json::Value {
    let mut value = serde_json::to_value(results).unwrap_or(serde_json::Value::Null);
    if let (Some(error), Some(object)) = (&report.error, value.as_object_mut()) {
        object.insert("error".to_string(), serde_json::Value::String(error.clone()));
    }
    serde_json::Value::Array(vec![serde_json::Value::String(report.file.clone()), value])
}

/// Generate JSON report
fn generate_json_report(reports: &[FileReport], flat: bool) -> String {
    let entries: Vec<serde_json::Value> = reports
        .iter()
        .map(|report| {
            if flat {
                file_entry(report, report.results.flat())
            } else {
                file_entry(report, &report.results)
            }
        })
        .collect();

    serde_json::to_string(&entries).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize results: {}\"}}", e)
    })
}

/// SARIF report structure (simplified)
#[derive(Debug, Serialize)]
struct SarifReport {
    #[serde(rename = "$schema")]
    schema: String,
    version: String,
    runs: Vec<SarifRun>,
}

#[derive(Debug, Serialize)]
struct SarifRun {
    tool: SarifTool,
    results: Vec<SarifResult>,
}

#[derive(Debug, Serialize)]
struct SarifTool {
    driver: SarifDriver,
}

#[derive(Debug, Serialize)]
struct SarifDriver {
    name: String,
    version: String,
}

#[derive(Debug, Serialize)]
struct SarifResult {
    #[serde(rename = "ruleId")]
    rule_id: String,
    level: String,
    message: SarifMessage,
    locations: Vec<SarifLocation>,
    properties: SarifProperties,
}

#[derive(Debug, Serialize)]
struct SarifMessage {
    text: String,
}

#[derive(Debug, Serialize)]
struct SarifLocation {
    #[serde(rename = "physicalLocation")]
    physical_location: SarifPhysicalLocation,
    #[serde(rename = "logicalLocations", skip_serializing_if = "Vec::is_empty")]
    logical_locations: Vec<SarifLogicalLocation>,
}

#[derive(Debug, Serialize)]
struct SarifPhysicalLocation {
    #[serde(rename = "artifactLocation")]
    artifact_location: SarifArtifactLocation,
}

#[derive(Debug, Serialize)]
struct SarifArtifactLocation {
    uri: String,
}

#[derive(Debug, Serialize)]
struct SarifLogicalLocation {
    #[serde(rename = "fullyQualifiedName")]
    fully_qualified_name: String,
}

#[derive(Debug, Serialize)]
struct SarifProperties {
    guideline: String,
    technique: String,
}

fn sarif_location(file: &str, xpath: &str) -> SarifLocation {
    SarifLocation {
        physical_location: SarifPhysicalLocation {
            artifact_location: SarifArtifactLocation {
                uri: file.to_string(),
            },
        },
        logical_locations: if xpath.is_empty() {
            Vec::new()
        } else {
            vec![SarifLogicalLocation {
                fully_qualified_name: xpath.to_string(),
            }]
        },
    }
}

/// Generate SARIF report
fn generate_sarif_report(reports: &[FileReport]) -> String {
    let mut results = Vec::new();

    for report in reports {
        if let Some(ref error) = report.error {
            results.push(SarifResult {
                rule_id: "document-error".to_string(),
                level: "error".to_string(),
                message: SarifMessage { text: error.clone() },
                locations: vec![sarif_location(&report.file, "")],
                properties: SarifProperties {
                    guideline: String::new(),
                    technique: String::new(),
                },
            });
        }

        for (kind, level) in [(OutcomeKind::Failure, "error"), (OutcomeKind::Warning, "warning")] {
            for outcome in report.results.outcomes(kind) {
                let rule_id = outcome
                    .error_code
                    .clone()
                    .unwrap_or_else(|| outcome.guideline.clone());
                let text = match outcome.message.as_deref() {
                    Some(message) if !message.is_empty() => message.to_string(),
                    _ => format!("WCAG {} {} at {}", outcome.guideline, outcome.technique, outcome.xpath),
                };

                results.push(SarifResult {
                    rule_id,
                    level: level.to_string(),
                    message: SarifMessage { text },
                    locations: vec![sarif_location(&report.file, &outcome.xpath)],
                    properties: SarifProperties {
                        guideline: outcome.guideline.clone(),
                        technique: outcome.technique.clone(),
                    },
                });
            }
        }
    }

    let report = SarifReport {
        schema: "https://json.schemastore.org/sarif-2.1.0.json".to_string(),
        version: "2.1.0".to_string(),
        runs: vec![SarifRun {
            tool: SarifTool {
                driver: SarifDriver {
                    name: "wcag-zoo".to_string(),
                    version: env!("CARGO_PKG_VERSION").to_string(),
                },
            },
            results,
        }],
    };

    serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        format!("{{\"error\": \"Failed to serialize SARIF report: {}\"}}", e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{Outcome, ValidationResults};

    fn sample_reports() -> Vec<FileReport> {
        let mut results = ValidationResults::new();
        results.add_failure(
            Outcome::new("1.1.1", "H37")
                .with_error_code("anteater-1")
                .with_message("Missing alt tag on image for element - /html/body/img"),
        );
        results.add_warning(
            Outcome::new("2.1.1", "G202")
                .with_error_code("ayeaye-3-warning")
                .with_message("No `accesskey` attributes found"),
        );
        results.add_success(Outcome::new("1.3.1", "H42"));

        vec![
            FileReport {
                file: "index.html".to_string(),
                results,
                error: None,
            },
            FileReport {
                file: "broken.html".to_string(),
                results: ValidationResults::new(),
                error: Some("Document parse failure: input is not valid UTF-8".to_string()),
            },
        ]
    }

    fn options(verbosity: u8) -> ReportOptions {
        ReportOptions {
            level: WcagLevel::AA,
            verbosity,
            warnings_as_errors: false,
        }
    }

    #[test]
    fn test_text_report_summary() {
        let report = generate_report(&sample_reports(), OutputFormat::Text, options(1));
        assert!(report.contains("Starting - index.html ... "));
        assert!(report.contains("failed"));
        assert!(report.contains("Tested at WCAG2.0 AA Level"));
        assert!(report.ends_with("2 errors, 1 warnings in 2 files"));
        assert!(!report.contains("ERROR - Missing alt"));
    }

    #[test]
    fn test_warnings_only_file_fails_with_warnings_as_errors() {
        let mut results = ValidationResults::new();
        results.add_warning(Outcome::new("1.1.1", "H37").with_error_code("anteater-2"));
        let reports = vec![FileReport {
            file: "spacer.html".to_string(),
            results,
            error: None,
        }];

        let lenient = generate_report(&reports, OutputFormat::Text, options(1));
        assert!(lenient.contains(&"ok".green().bold().to_string()));

        let strict = ReportOptions {
            warnings_as_errors: true,
            ..options(1)
        };
        let strict = generate_report(&reports, OutputFormat::Text, strict);
        assert!(strict.contains(&"failed".red().bold().to_string()));
        assert!(!strict.contains(&"ok".green().bold().to_string()));
    }

    #[test]
    fn test_text_report_verbosity() {
        let quiet = generate_report(&sample_reports(), OutputFormat::Text, options(0));
        assert!(!quiet.contains("Starting"));

        let chatty = generate_report(&sample_reports(), OutputFormat::Text, options(2));
        assert!(chatty.contains("ERROR - Missing alt tag"));
        assert!(chatty.contains("         - 1 succeeded"));
        assert!(!chatty.contains("WARNING - "));

        let loud = generate_report(&sample_reports(), OutputFormat::Text, options(3));
        assert!(loud.contains("WARNING - No `accesskey` attributes found"));
    }

    #[test]
    fn test_json_report_nested() {
        let report = generate_report(&sample_reports(), OutputFormat::Json, options(1));
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed[0][0], "index.html");
        assert_eq!(parsed[0][1]["failures"]["1.1.1"]["H37"][0]["error_code"], "anteater-1");
        assert!(parsed[1][1]["error"].as_str().unwrap().contains("UTF-8"));
    }

    #[test]
    fn test_flat_json_report() {
        let report = generate_report(&sample_reports(), OutputFormat::FlatJson, options(1));
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed[0][1]["failures"].as_array().unwrap().len(), 1);
        assert_eq!(parsed[0][1]["warnings"][0]["error_code"], "ayeaye-3-warning");
        assert_eq!(parsed[0][1]["success"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_sarif_report() {
        let report = generate_report(&sample_reports(), OutputFormat::Sarif, options(1));
        let parsed: serde_json::Value = serde_json::from_str(&report).expect("valid JSON");
        assert_eq!(parsed["version"], "2.1.0");
        let results = parsed["runs"][0]["results"].as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0]["ruleId"], "anteater-1");
        assert_eq!(results[1]["level"], "warning");
        assert_eq!(results[2]["ruleId"], "document-error");
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("flat-json".parse::<OutputFormat>().unwrap(), OutputFormat::FlatJson);
        assert_eq!("sarif".parse::<OutputFormat>().unwrap(), OutputFormat::Sarif);
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
