// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! paramexport CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use paramexport::cli::Reporter;
use paramexport::config::{RunConfig, CONFIG_FILE};
use paramexport::document::DesignDocument;
use paramexport::logging::{init_logging, LogConfig, LogFormat};
use paramexport::report::ExportRecord;
use paramexport::{
    discover_targets, load_combinations, ExportDriver, FailurePolicy, MeshRefinement,
    MissingParameterPolicy,
};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "paramexport")]
#[command(about = "Export CAD bodies as meshes for every parameter combination", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Export every visible body for each of its parameter combinations
    Run {
        /// Design document (JSON or TOML)
        #[arg(short, long, value_name = "FILE")]
        design: PathBuf,

        /// Parameter table (CSV)
        #[arg(short, long, value_name = "CSV")]
        table: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Mesh refinement
        #[arg(short, long, value_enum)]
        refinement: Option<MeshRefinement>,

        /// Stop at the first failed export
        #[arg(long)]
        fail_fast: bool,

        /// Treat parameters missing from the model as errors
        #[arg(long)]
        strict: bool,

        /// Configuration file (defaults to ./paramexport.toml when present)
        #[arg(short, long, value_name = "TOML")]
        config: Option<PathBuf>,

        /// Write a JSON run report
        #[arg(long, value_name = "JSON")]
        report: Option<PathBuf>,
    },

    /// List the export targets found in a design
    Targets {
        /// Design document (JSON or TOML)
        #[arg(short, long, value_name = "FILE")]
        design: PathBuf,

        /// Also show how many combinations each target gets
        #[arg(short, long, value_name = "CSV")]
        table: Option<PathBuf>,
    },

    /// Expand a parameter table into its combinations
    Combinations {
        /// Parameter table (CSV)
        #[arg(short, long, value_name = "CSV")]
        table: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_config = LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format);
    init_logging(&log_config).context("Failed to initialize logging")?;

    match cli.command {
        Commands::Run {
            design,
            table,
            output,
            refinement,
            fail_fast,
            strict,
            config,
            report,
        } => {
            // Environment wins over the file, flags win over both
            let mut run_config =
                RunConfig::load_with(config.as_deref(), |key| std::env::var(key).ok())?;

            if table.is_some() {
                run_config.table = table;
            }
            if output.is_some() {
                run_config.output_dir = output;
            }
            if let Some(refinement) = refinement {
                run_config.refinement = refinement;
            }
            if fail_fast {
                run_config.failure_policy = FailurePolicy::FailFast;
            }
            if strict {
                run_config.missing_parameters = MissingParameterPolicy::Error;
            }

            let success = run_command(&design, &run_config, report.as_deref())?;
            if !success {
                std::process::exit(1);
            }
        }
        Commands::Targets { design, table } => targets_command(&design, table.as_deref())?,
        Commands::Combinations { table, json } => combinations_command(&table, json)?,
    }

    Ok(())
}

fn run_command(design: &Path, config: &RunConfig, report_path: Option<&Path>) -> Result<bool> {
    let (table, output_dir) = config.validate().with_context(|| {
        format!(
            "Pass --table and --output, or set them in {}",
            CONFIG_FILE
        )
    })?;

    let mut document = DesignDocument::from_path(design)?;
    let targets = discover_targets(&document);
    let combinations = load_combinations(table)?;

    std::fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;

    let driver = ExportDriver::new(&combinations, config.driver_options(output_dir));

    let progress = ProgressBar::new(driver.planned_exports(&targets) as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .context("Invalid progress bar template")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let report = driver.run_with_observer(&mut document, &targets, &mut |record: &ExportRecord| {
        progress.set_message(record.target.clone());
        progress.inc(1);
    });
    progress.finish_and_clear();

    Reporter::report_run(&report, start.elapsed());

    if let Some(path) = report_path {
        report.write_json(path)?;
        Reporter::report_info(&format!("Report written to {}", path.display()));
    }

    if report.is_success() {
        Reporter::success(&format!(
            "{} files written to {}",
            report.exported(),
            output_dir.display()
        ));
    }

    Ok(report.is_success())
}

fn targets_command(design: &Path, table: Option<&Path>) -> Result<()> {
    let document = DesignDocument::from_path(design)?;
    let targets = discover_targets(&document);

    let combinations = table.map(load_combinations).transpose()?;
    Reporter::report_targets(&targets, combinations.as_ref());

    Ok(())
}

fn combinations_command(table: &Path, json: bool) -> Result<()> {
    let combinations = load_combinations(table)?;

    if json {
        let mut map = serde_json::Map::new();
        for (target, set) in combinations.iter() {
            map.insert(target.to_string(), serde_json::to_value(set)?);
        }
        println!("{}", serde_json::to_string_pretty(&map)?);
    } else {
        Reporter::report_combinations(&combinations);
    }

    Ok(())
}
