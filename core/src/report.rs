//! Report flow: summarize processed tables, or build them from raw exports.
//!
//! Precedence:
//!   1. Processed SKU and daily tables both exist (and `reprocess` is off):
//!      reload them.
//!   2. Raw SKU and daily exports both exist: process them, writing the
//!      processed tables.
//!   3. Otherwise nothing is read or written; the caller reports which
//!      raw files were expected.

use crate::{
    config::PipelineConfig,
    daily::{load_processed_daily, process_daily_data},
    error::PipelineResult,
    sku::{load_processed_skus, process_sku_data},
    summary::SummaryStats,
};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    /// Summary of existing processed tables.
    FromProcessed(SummaryStats),
    /// Summary of freshly processed raw exports.
    FromRaw(SummaryStats),
    /// Neither processed tables nor raw exports were found.
    MissingInputs { expected: Vec<PathBuf> },
}

impl ReportOutcome {
    pub fn summary(&self) -> Option<&SummaryStats> {
        match self {
            ReportOutcome::FromProcessed(s) | ReportOutcome::FromRaw(s) => Some(s),
            ReportOutcome::MissingInputs { .. } => None,
        }
    }
}

pub fn run_report(config: &PipelineConfig, reprocess: bool) -> PipelineResult<ReportOutcome> {
    let sku_output = config.sku_output_path();
    let daily_output = config.daily_output_path();
    let raw_sku = config.raw_sku_path();
    let raw_daily = config.raw_daily_path();

    if !reprocess && sku_output.exists() && daily_output.exists() {
        log::info!("loading processed tables from {}", config.data_dir.display());
        let skus = load_processed_skus(&sku_output)?;
        let daily = load_processed_daily(&daily_output)?;
        return Ok(ReportOutcome::FromProcessed(SummaryStats::compute(&skus, daily.len())));
    }

    if raw_sku.exists() && raw_daily.exists() {
        let skus = process_sku_data(&raw_sku, &sku_output, config)?;
        let daily = process_daily_data(&raw_daily, &daily_output, config)?;
        return Ok(ReportOutcome::FromRaw(SummaryStats::compute(&skus, daily.len())));
    }

    log::warn!("no raw exports in {}", config.data_dir.display());
    Ok(ReportOutcome::MissingInputs { expected: vec![raw_sku, raw_daily] })
}
