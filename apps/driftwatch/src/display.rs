//! Output rendering and formatting

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use driftwatch_ops::{CheckReport, FetchReport, FreezeReport, OperationResult, TrustedSource};
use driftwatch_verify::Discrepancy;
use std::io;

/// Output renderer for CLI results
#[derive(Clone)]
pub struct OutputRenderer {
    /// Use JSON output format
    json_output: bool,
    /// Whether styling is applied to human-readable output
    colors_enabled: bool,
}

impl OutputRenderer {
    /// Create new output renderer
    pub fn new(json_output: bool, colors_enabled: bool) -> Self {
        Self {
            json_output,
            colors_enabled,
        }
    }

    /// Render operation result
    pub fn render_result(&self, result: &OperationResult) -> io::Result<()> {
        if self.json_output {
            self.render_json(result)
        } else {
            self.render_human(result)
        }
    }

    /// Render as JSON
    fn render_json(&self, result: &OperationResult) -> io::Result<()> {
        let json = result.to_json().map_err(io::Error::other)?;
        println!("{json}");
        Ok(())
    }

    /// Render as human-readable output
    fn render_human(&self, result: &OperationResult) -> io::Result<()> {
        match result {
            OperationResult::Freeze(report) => self.render_freeze_report(report),
            OperationResult::Check(report) => self.render_check_report(report),
            OperationResult::Fetch(report) => self.render_fetch_report(report),
        }
    }

    /// Render freeze report
    fn render_freeze_report(&self, report: &FreezeReport) -> io::Result<()> {
        println!(
            "Froze {} libraries ({} files) into {} ({}ms)",
            report.libraries,
            report.files,
            report.freeze_file.display(),
            report.duration_ms
        );
        Ok(())
    }

    /// Render check report with discrepancy table and diffs
    fn render_check_report(&self, report: &CheckReport) -> io::Result<()> {
        let drift = &report.drift;

        if drift.is_clean {
            let message = format!(
                "No drift detected: {} files across {} libraries match the baseline.",
                drift.files_checked, drift.libraries_checked
            );
            if self.colors_enabled {
                println!("{}", style(message).green());
            } else {
                println!("{message}");
            }
            return Ok(());
        }

        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);

        table.set_header(vec![
            Cell::new("Kind").add_attribute(Attribute::Bold),
            Cell::new("Library").add_attribute(Attribute::Bold),
            Cell::new("File").add_attribute(Attribute::Bold),
        ]);

        for discrepancy in &drift.discrepancies {
            let kind_cell = match discrepancy {
                Discrepancy::Modified { .. } => Cell::new("modified").fg(Color::Yellow),
                Discrepancy::Removed { .. } => Cell::new("removed").fg(Color::Red),
            };
            table.add_row(vec![
                kind_cell,
                Cell::new(discrepancy.library()),
                Cell::new(discrepancy.relative_name()),
            ]);
        }

        println!("{table}");

        if !report.diff_output.is_empty() {
            println!();
            self.print_diff(&report.diff_output);
        }

        let baseline = match report.trusted_source {
            TrustedSource::FreezeFile => "freeze file",
            TrustedSource::TrustedDir => "trusted directory",
        };
        let summary = format!(
            "{} discrepancies in {} files checked (baseline: {baseline}).",
            drift.discrepancies.len(),
            drift.files_checked
        );
        if self.colors_enabled {
            println!("{}", style(summary).red().bold());
        } else {
            println!("{summary}");
        }

        Ok(())
    }

    /// Render fetch report
    fn render_fetch_report(&self, report: &FetchReport) -> io::Result<()> {
        println!(
            "Fetched {} packages into {} via {} ({}ms):",
            report.packages.len(),
            report.dest.display(),
            report.tool,
            report.duration_ms
        );
        for package in &report.packages {
            println!("  • {package}");
        }
        Ok(())
    }

    /// Print a rendered diff, styling unified-diff markers when enabled
    fn print_diff(&self, diff: &str) {
        for line in diff.lines() {
            if !self.colors_enabled {
                println!("{line}");
                continue;
            }

            if line.starts_with("+++") || line.starts_with("---") {
                println!("{}", style(line).bold());
            } else if line.starts_with("@@") {
                println!("{}", style(line).cyan());
            } else if line.starts_with('+') {
                println!("{}", style(line).green());
            } else if line.starts_with('-') {
                println!("{}", style(line).red());
            } else {
                println!("{line}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_verify::DriftReport;
    use std::path::PathBuf;

    #[test]
    fn test_render_freeze_report() {
        let renderer = OutputRenderer::new(false, false);
        let report = FreezeReport {
            freeze_file: PathBuf::from("/tmp/freeze.json"),
            libraries: 2,
            files: 14,
            duration_ms: 3,
        };
        renderer
            .render_result(&OperationResult::Freeze(report))
            .unwrap();
    }

    #[test]
    fn test_render_clean_check_report() {
        let renderer = OutputRenderer::new(false, false);
        let report = CheckReport {
            trusted_source: TrustedSource::FreezeFile,
            checked_dir: PathBuf::from("/tmp/site-packages"),
            drift: DriftReport::new(Vec::new(), 1, 3, 5),
            diff_output: String::new(),
            duration_ms: 7,
        };
        renderer
            .render_result(&OperationResult::Check(report))
            .unwrap();
    }

    #[test]
    fn test_render_json_is_parseable() {
        let renderer = OutputRenderer::new(true, false);
        let report = FetchReport {
            tool: "pip".to_string(),
            packages: vec!["requests".to_string()],
            dest: PathBuf::from("/tmp/trusted"),
            duration_ms: 42,
        };
        // Renders to stdout; only asserts the JSON conversion holds up.
        renderer
            .render_result(&OperationResult::Fetch(report.clone()))
            .unwrap();

        let json = OperationResult::Fetch(report).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["type"], "fetch");
        assert_eq!(value["data"]["tool"], "pip");
    }
}
