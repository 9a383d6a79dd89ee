// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! CLI output reporter with colored formatting

use crate::params::CombinationMap;
use crate::report::{ExportStatus, RunReport, RunWarning};
use crate::scene::ExportTarget;
use colored::*;
use std::time::Duration;

/// CLI reporter for formatted output
pub struct Reporter;

impl Reporter {
    /// Summary of a finished export run
    pub fn report_run(report: &RunReport, duration: Duration) {
        println!("\n{}", "━".repeat(80).bright_black());
        println!("{}", "Export Summary".bold());
        println!("{}", "━".repeat(80).bright_black());

        println!(
            "  {} {}",
            "Targets:".bright_black(),
            report.targets.to_string().cyan()
        );
        println!(
            "  {} {}",
            "Exported:".bright_black(),
            report.exported().to_string().green()
        );
        let failed = report.failed().to_string();
        println!(
            "  {} {}",
            "Failed:".bright_black(),
            if report.failed() > 0 {
                failed.red()
            } else {
                failed.green()
            }
        );
        println!(
            "  {} {}",
            "Parameters restored:".bright_black(),
            report.restored_parameters.to_string().cyan()
        );
        println!(
            "  {} {}",
            "Time:".bright_black(),
            Self::format_duration(duration).yellow()
        );

        for record in report.failures() {
            if let ExportStatus::Failed { message } = &record.status {
                println!("    {} {}", "❌".red(), record.path.display());
                println!("       {}", message.bright_black());
            }
        }

        for warning in &report.warnings {
            Self::report_warning(&Self::describe_warning(warning));
        }

        if let Some(reason) = &report.aborted {
            Self::report_error(&format!("Run stopped: {}", reason));
        }

        println!("{}", "━".repeat(80).bright_black());
    }

    /// List discovered targets and how many exports each will produce
    pub fn report_targets<B>(targets: &[ExportTarget<B>], combinations: Option<&CombinationMap>) {
        println!("{} {}", "Targets:".bold(), targets.len().to_string().cyan());
        for target in targets {
            let exports = combinations
                .and_then(|map| map.get(&target.name))
                .map(|set| format!("{} combinations", set.len()))
                .unwrap_or_else(|| "no parameters".to_string());
            println!(
                "  {} {} {}",
                target.stem().cyan(),
                format!("({})", target.node_name).bright_black(),
                exports.bright_black()
            );
        }
    }

    pub fn report_combinations(combinations: &CombinationMap) {
        for (target, set) in combinations.iter() {
            println!(
                "{} {} {}",
                target.bold(),
                format!("[{}]", set.parameters().join(", ")).bright_black(),
                format!("{} combinations", set.len()).cyan()
            );
            for combination in set {
                println!("  {}", combination);
            }
        }
    }

    /// Report error
    pub fn report_error(message: &str) {
        eprintln!("\n{} {}", "❌ Error:".red().bold(), message);
    }

    /// Report warning
    pub fn report_warning(message: &str) {
        println!("{} {}", "⚠️  Warning:".yellow().bold(), message);
    }

    /// Report info
    pub fn report_info(message: &str) {
        println!("{} {}", "ℹ️".bright_blue(), message);
    }

    /// Print success message
    pub fn success(message: &str) {
        println!("{} {}", "✅".green(), message.green());
    }

    fn describe_warning(warning: &RunWarning) -> String {
        match warning {
            RunWarning::MissingParameter { target, parameter } => {
                format!("parameter '{}' not found on the model ({})", parameter, target)
            }
            RunWarning::DuplicateOutput { path } => {
                format!("{} was written more than once", path.display())
            }
        }
    }

    /// Format duration for display
    fn format_duration(duration: Duration) -> String {
        let micros = duration.as_micros();

        if micros < 1_000 {
            format!("{}µs", micros)
        } else if micros < 1_000_000 {
            format!("{:.2}ms", micros as f64 / 1_000.0)
        } else {
            format!("{:.2}s", micros as f64 / 1_000_000.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_duration() {
        assert_eq!(
            Reporter::format_duration(Duration::from_micros(500)),
            "500µs"
        );
        assert_eq!(
            Reporter::format_duration(Duration::from_millis(5)),
            "5.00ms"
        );
        assert_eq!(Reporter::format_duration(Duration::from_secs(2)), "2.00s");
    }

    #[test]
    fn test_describe_warning() {
        let text = Reporter::describe_warning(&RunWarning::DuplicateOutput {
            path: PathBuf::from("out/A_B.stl"),
        });
        assert!(text.contains("A_B.stl"));
    }
}
