//! Cutting plan CLI

use anyhow::Context;
use clap::{Parser, Subcommand};
use cutplan_cli::report::{overview, write_plan_csv};
use cutplan_cli::{Job, RunReport, SyntheticGenerator};
use cutplan_core::{ProgressCallback, DEFAULT_SHEET_SIZES};
use cutplan_engine::PlanEngine;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cutplan")]
#[command(about = "Sheet cutting plan calculator")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a cutting plan for a job file
    Run {
        /// Path to the JSON job file
        job: PathBuf,

        /// Output file for the plan (JSON). Printed to stdout if omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output file for the summary and detail tables (CSV)
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Time limit in seconds, overriding the job's configuration
        #[arg(short, long)]
        time_limit: Option<u64>,

        /// Skip local refinement of sparse sheets
        #[arg(long)]
        no_refine: bool,

        /// Skip the global re-packing pass
        #[arg(long)]
        no_global: bool,

        /// Evaluate packing attempts on a single thread
        #[arg(long)]
        sequential: bool,
    },

    /// Generate a synthetic job file
    Generate {
        /// Output file
        #[arg(short, long, default_value = "job.json")]
        output: PathBuf,

        /// Number of part lines
        #[arg(short = 'n', long, default_value = "30")]
        count: usize,

        /// Number of distinct material groups (1-4)
        #[arg(short, long, default_value = "2")]
        materials: usize,

        /// Generate identical squares of this side length instead
        #[arg(long)]
        uniform: Option<f64>,

        /// Random seed for reproducibility
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },

    /// List the default stock sheet sizes
    Sizes,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

fn progress_logger() -> ProgressCallback {
    Box::new(|info| {
        if info.running {
            tracing::info!(
                "[{:5.1}%] {} ({}/{} groups, {} ms)",
                info.percent,
                info.message,
                info.groups_done,
                info.groups_total,
                info.elapsed_ms
            );
        } else {
            tracing::info!("{}", info.message);
        }
    })
}

fn create(path: &Path) -> anyhow::Result<BufWriter<File>> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run {
            job,
            output,
            csv,
            time_limit,
            no_refine,
            no_global,
            sequential,
        } => {
            let job = Job::load(&job)?;
            let parts = job.part_list()?;

            let mut config = job.plan_config();
            if let Some(secs) = time_limit {
                config = config.with_time_limit(secs.saturating_mul(1000));
            }
            if no_refine {
                config = config.with_refine(false);
            }
            if no_global {
                config = config.with_global_optimization(false);
            }
            if sequential {
                config = config.with_parallel(false);
            }

            tracing::info!(
                "{} part lines, {} pieces, {} sheet sizes",
                parts.len(),
                parts.total_quantity(),
                config.sheet_sizes.len()
            );

            let engine = PlanEngine::new(config);
            let plan = engine
                .calculate(parts.as_slice(), Some(progress_logger()))
                .context("calculation failed")?;
            let report = RunReport::new(&plan);

            match output {
                Some(path) => {
                    let mut out = create(&path)?;
                    report.write_json(&mut out)?;
                    out.flush()?;
                    tracing::info!("plan written to {}", path.display());
                }
                None => report.write_json(&mut io::stdout().lock())?,
            }

            if let Some(path) = csv {
                let mut out = create(&path)?;
                write_plan_csv(&mut out, &plan)?;
                out.flush()?;
                tracing::info!("tables written to {}", path.display());
            }

            eprintln!("{}", overview(&plan));
        }

        Commands::Generate {
            output,
            count,
            materials,
            uniform,
            seed,
        } => {
            let mut generator = SyntheticGenerator::with_seed(seed);
            let job = match uniform {
                Some(side) => generator.uniform(count, side),
                None => generator.mixed(count, materials),
            };
            job.save(&output)?;
            println!(
                "Generated {} part lines ({} pieces) -> {}",
                job.parts.len(),
                job.parts.iter().map(|p| p.quantity).sum::<usize>(),
                output.display()
            );
        }

        Commands::Sizes => {
            println!("Default sheet sizes:");
            println!("====================");
            for size in DEFAULT_SHEET_SIZES {
                println!("  - {size}");
            }
        }
    }

    Ok(())
}
