//! sku-report: clean Sellerboard exports and print a SKU health summary.
//!
//! Usage:
//!   sku-report --data-dir ./data
//!   sku-report --data-dir ./data --config pipeline.json --reprocess
//!   sku-report --json

use anyhow::Result;
use sku_health_core::{config::PipelineConfig, run_report, ReportOutcome};
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let reprocess = args.iter().any(|a| a == "--reprocess");
    let json = args.iter().any(|a| a == "--json");

    let mut config = match arg_value(&args, "--config") {
        Some(path) => PipelineConfig::load(&PathBuf::from(path))?,
        None => PipelineConfig::default(),
    };
    if let Some(dir) = arg_value(&args, "--data-dir") {
        config.data_dir = PathBuf::from(dir);
    }

    let summary = match run_report(&config, reprocess)? {
        ReportOutcome::FromProcessed(summary) => {
            if !json {
                println!("Processed data files already exist.");
                println!("Loaded existing files for summary.");
            }
            summary
        }
        ReportOutcome::FromRaw(summary) => {
            if !json {
                for (raw, out) in [
                    (config.raw_sku_path(), config.sku_output_path()),
                    (config.raw_daily_path(), config.daily_output_path()),
                ] {
                    println!("Processed {} -> {}", raw.display(), out.display());
                }
            }
            summary
        }
        ReportOutcome::MissingInputs { expected } => {
            println!(
                "Raw data files not found. Please place Sellerboard exports in {} directory.",
                config.data_dir.display()
            );
            let names: Vec<String> = expected.iter().map(|p| p.display().to_string()).collect();
            println!("Expected files: {}", names.join(", "));
            return Ok(());
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{summary}");
    }
    Ok(())
}

fn arg_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
