//! Detaug: validation and photometric augmentation for object-detection datasets.
//!
//! Detaug pairs every image with its bounding-box label file, then writes a
//! fixed battery of color augmentations per image together with a verbatim
//! copy of its label. The augmentations never move pixels, so the labels stay
//! valid without being parsed.
//!
//! # Modules
//!
//! - [`pairing`]: Matching image and label trees by base name
//! - [`plan`]: The ordered, collision-free list of augmentations
//! - [`color`]: Pure color transforms (channel blend, hue, brightness, saturation)
//! - [`augment`]: Per-pair engine, output writer, and the run pipeline
//! - [`archive`]: Unpacking zipped annotation-tool exports (feature `archive`)
//! - [`error`]: Error types for detaug operations

#[cfg(feature = "archive")]
pub mod archive;
pub mod augment;
pub mod color;
pub mod error;
pub mod logger;
pub mod pairing;
mod paths;
pub mod plan;

use std::fmt::Display;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use augment::{run_pipeline, AugmentationEngine, Execution, OutputWriter, PipelineObserver};
pub use error::DetaugError;
use pairing::{MatchOptions, PairingReport};
use plan::AugmentationPlan;

/// The detaug CLI application.
#[derive(Parser)]
#[command(name = "detaug")]
#[command(version, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Check that every image has a label and report mismatches.
    Check(CheckArgs),
    /// Validate, then write color augmentations for every matched pair.
    Augment(AugmentArgs),
    /// Print the augmentation plan.
    Plan(PlanArgs),
    /// Unpack a zipped export and collect its images or labels.
    #[cfg(feature = "archive")]
    Collect(CollectArgs),
}

/// Output format for reports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Arguments for the check subcommand.
#[derive(clap::Args)]
struct CheckArgs {
    /// Image root, walked recursively.
    #[arg(long, default_value = "images")]
    images: PathBuf,

    /// Label root, walked recursively.
    #[arg(long, default_value = "labels")]
    labels: PathBuf,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Arguments for the augment subcommand.
#[derive(clap::Args)]
struct AugmentArgs {
    /// Image root, walked recursively.
    #[arg(long, default_value = "images")]
    images: PathBuf,

    /// Label root, walked recursively.
    #[arg(long, default_value = "labels")]
    labels: PathBuf,

    /// Directory for augmented images.
    #[arg(long, default_value = "processed_img")]
    out_images: PathBuf,

    /// Directory for duplicated labels.
    #[arg(long, default_value = "processed_txt")]
    out_labels: PathBuf,

    /// YAML or JSON file overriding the augmentation parameter lists.
    #[arg(long, env = "DETAUG_CONFIG")]
    config: Option<PathBuf>,

    /// Number of pairs processed concurrently (1 = sequential).
    #[arg(long, default_value_t = 1)]
    jobs: usize,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Arguments for the plan subcommand.
#[derive(clap::Args)]
struct PlanArgs {
    /// YAML or JSON file overriding the augmentation parameter lists.
    #[arg(long, env = "DETAUG_CONFIG")]
    config: Option<PathBuf>,

    /// Output format for the plan.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

/// Arguments for the collect subcommand.
#[cfg(feature = "archive")]
#[derive(clap::Args)]
struct CollectArgs {
    /// Zip archive to unpack.
    archive: PathBuf,

    /// Which files to collect.
    #[arg(long, value_enum)]
    kind: CollectKindArg,

    /// Directory receiving one subfolder per (inner) archive.
    #[arg(long)]
    out: PathBuf,

    /// Output format for the report.
    #[arg(long, value_enum, default_value = "text")]
    output: ReportFormat,
}

#[cfg(feature = "archive")]
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum CollectKindArg {
    Images,
    Labels,
}

/// Run the detaug CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), DetaugError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Check(args)) => run_check(args),
        Some(Commands::Augment(args)) => run_augment(args),
        Some(Commands::Plan(args)) => run_plan(args),
        #[cfg(feature = "archive")]
        Some(Commands::Collect(args)) => run_collect(args),
        None => {
            println!("detaug {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Validate and photometrically augment object-detection datasets.");
            println!();
            println!("Run 'detaug --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the check subcommand.
fn run_check(args: CheckArgs) -> Result<(), DetaugError> {
    let report = pairing::match_pairs(&args.images, &args.labels, &MatchOptions::default());
    emit(&report, args.output)?;
    gate(report)
}

/// Execute the augment subcommand.
fn run_augment(args: AugmentArgs) -> Result<(), DetaugError> {
    let plan = load_plan(args.config.as_deref())?;

    let observer = augment::TracingObserver;
    let pairing = pairing::match_pairs(&args.images, &args.labels, &MatchOptions::default());
    observer.mismatch_summary(&pairing);

    if !pairing.is_ok() {
        emit(&pairing, args.output)?;
        return gate(pairing);
    }

    let engine = AugmentationEngine::new(plan, OutputWriter::new(args.out_images, args.out_labels));
    let run = run_pipeline(
        &pairing.pairs,
        &engine,
        Execution::from_jobs(args.jobs),
        &observer,
    )?;

    match args.output {
        ReportFormat::Text => {
            print!("{}", pairing);
            println!();
            print!("{}", run);
        }
        ReportFormat::Json => {
            #[derive(Serialize)]
            struct AugmentOutput<'a> {
                pairing: &'a PairingReport,
                run: &'a augment::RunReport,
            }
            let output = AugmentOutput {
                pairing: &pairing,
                run: &run,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    if run.is_complete() {
        Ok(())
    } else {
        Err(DetaugError::AugmentationIncomplete {
            failed: run.failed(),
            attempted: run.pairs_attempted,
        })
    }
}

/// Execute the plan subcommand.
fn run_plan(args: PlanArgs) -> Result<(), DetaugError> {
    let plan = load_plan(args.config.as_deref())?;
    emit(&plan, args.output)
}

/// Execute the collect subcommand.
#[cfg(feature = "archive")]
fn run_collect(args: CollectArgs) -> Result<(), DetaugError> {
    let kind = match args.kind {
        CollectKindArg::Images => archive::CollectKind::Images,
        CollectKindArg::Labels => archive::CollectKind::Labels,
    };
    let report = archive::collect_archive(&args.archive, &args.out, kind)?;
    emit(&report, args.output)
}

fn load_plan(config: Option<&Path>) -> Result<AugmentationPlan, DetaugError> {
    match config {
        Some(path) => AugmentationPlan::new(&plan::load_config(path)?),
        None => Ok(AugmentationPlan::default()),
    }
}

fn gate(report: PairingReport) -> Result<(), DetaugError> {
    if report.is_ok() {
        Ok(())
    } else {
        Err(DetaugError::Validation {
            report: Box::new(report),
        })
    }
}

fn emit<T: Serialize + Display>(value: &T, format: ReportFormat) -> Result<(), DetaugError> {
    match format {
        ReportFormat::Text => print!("{}", value),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}
