//! SKU-level processing: clean, derive ratios, categorize, score,
//! anonymize.
//!
//! Stage order (fixed):
//!   1. clean_numeric     Revenue, COGS, Net_Profit, Units_Sold, Refunds
//!                        (+ Amazon_Fees when present)
//!   2. sku_ratios        Margin_Pct, ROI_Pct, Refund_Rate_Pct,
//!                        Avg_Sale_Price, Profit_Per_Unit
//!   3. categorize        Category
//!   4. health_score      Health_Score, Performance_Tier
//!   5. anonymize_sku     SKU-0001, SKU-0002, ...

use crate::{
    categorizer::Categorizer,
    config::PipelineConfig,
    error::PipelineResult,
    metrics::SkuRatios,
    scoring::{HealthSignals, ScoreTable, TierCutoffs},
    stage::{CleanNumericColumns, TablePipeline, TableStage},
    table::Table,
    types::{columns as col, Category, SkuRecord},
};
use std::path::Path;

pub const SKU_TABLE: &str = "sku";

pub struct DeriveSkuRatios;

fn pick(ratios: &[SkuRatios], field: impl Fn(&SkuRatios) -> f64) -> Vec<f64> {
    ratios.iter().map(field).collect()
}

impl TableStage for DeriveSkuRatios {
    fn name(&self) -> &'static str { "sku_ratios" }

    fn apply(&self, table: &mut Table) -> PipelineResult<()> {
        let revenue = table.numeric_column(col::REVENUE)?;
        let cogs = table.numeric_column(col::COGS)?;
        let profit = table.numeric_column(col::NET_PROFIT)?;
        let units = table.numeric_column(col::UNITS_SOLD)?;
        let refunds = table.numeric_column(col::REFUNDS)?;

        let ratios: Vec<SkuRatios> = (0..table.len())
            .map(|i| SkuRatios::derive(revenue[i], cogs[i], profit[i], units[i], refunds[i]))
            .collect();

        table.set_numeric_column(col::MARGIN_PCT, &pick(&ratios, |r| r.margin_pct))?;
        table.set_numeric_column(col::ROI_PCT, &pick(&ratios, |r| r.roi_pct))?;
        table.set_numeric_column(col::REFUND_RATE_PCT, &pick(&ratios, |r| r.refund_rate_pct))?;
        table.set_numeric_column(col::AVG_SALE_PRICE, &pick(&ratios, |r| r.avg_sale_price))?;
        table.set_numeric_column(col::PROFIT_PER_UNIT, &pick(&ratios, |r| r.profit_per_unit))?;
        Ok(())
    }
}

/// Assign a category from the first product-name column found. Without
/// one, an existing Category column is validated and kept.
pub struct AssignCategories {
    pub categorizer:  Categorizer,
    pub name_columns: Vec<String>,
}

impl TableStage for AssignCategories {
    fn name(&self) -> &'static str { "categorize" }

    fn apply(&self, table: &mut Table) -> PipelineResult<()> {
        let name_column = self.name_columns.iter().find(|c| table.has_column(c));

        let categories: Vec<Category> = match name_column {
            Some(column) => table
                .text_column(column)?
                .into_iter()
                .map(|name| self.categorizer.categorize(name))
                .collect(),
            None if table.has_column(col::CATEGORY) => {
                log::info!("{}: no product name column, keeping existing {}", table.label, col::CATEGORY);
                table
                    .text_column(col::CATEGORY)?
                    .into_iter()
                    .map(|label| Category::from_label(label).unwrap_or(Category::Other))
                    .collect()
            }
            None => {
                log::warn!(
                    "{}: none of {:?} present, all rows categorized as {}",
                    table.label,
                    self.name_columns,
                    Category::Other
                );
                vec![Category::Other; table.len()]
            }
        };

        table.set_column(
            col::CATEGORY,
            categories.iter().map(|c| c.label().to_string()).collect(),
        )
    }
}

pub struct ScoreHealth {
    pub scoring: ScoreTable,
    pub tiers:   TierCutoffs,
}

impl TableStage for ScoreHealth {
    fn name(&self) -> &'static str { "health_score" }

    fn apply(&self, table: &mut Table) -> PipelineResult<()> {
        let profit = table.numeric_column(col::NET_PROFIT)?;
        let units = table.numeric_column(col::UNITS_SOLD)?;
        // A NaN ratio must reach the scorer as NaN, not as a missing 0.
        let roi = table.derived_column(col::ROI_PCT)?;
        let margin = table.derived_column(col::MARGIN_PCT)?;

        let scores: Vec<u8> = (0..table.len())
            .map(|i| {
                self.scoring.score(&HealthSignals {
                    net_profit: profit[i],
                    units_sold: units[i],
                    roi_pct:    roi[i],
                    margin_pct: margin[i],
                })
            })
            .collect();

        table.set_column(col::HEALTH_SCORE, scores.iter().map(u8::to_string).collect())?;
        table.set_column(
            col::PERFORMANCE_TIER,
            scores.iter().map(|&s| self.tiers.tier(s).label().to_string()).collect(),
        )
    }
}

/// Replace SKU identifiers with sequential `SKU-0001` labels.
pub struct AnonymizeSkus;

pub fn anonymized_sku(index: usize) -> String {
    format!("SKU-{:04}", index + 1)
}

impl TableStage for AnonymizeSkus {
    fn name(&self) -> &'static str { "anonymize_sku" }

    fn apply(&self, table: &mut Table) -> PipelineResult<()> {
        table.set_column(col::SKU, (0..table.len()).map(anonymized_sku).collect())
    }
}

pub fn sku_pipeline(config: &PipelineConfig) -> TablePipeline {
    TablePipeline::new(SKU_TABLE)
        .with_stage(CleanNumericColumns {
            required: &[col::REVENUE, col::COGS, col::NET_PROFIT, col::UNITS_SOLD, col::REFUNDS],
            optional: &[col::AMAZON_FEES],
        })
        .with_stage(DeriveSkuRatios)
        .with_stage(AssignCategories {
            categorizer:  config.categorizer(),
            name_columns: config.product_name_columns.clone(),
        })
        .with_stage(ScoreHealth {
            scoring: config.scoring.clone(),
            tiers:   config.tiers,
        })
        .with_stage(AnonymizeSkus)
}

/// Run the SKU pipeline over an in-memory table.
pub fn process_sku_table(table: &mut Table, config: &PipelineConfig) -> PipelineResult<Vec<SkuRecord>> {
    sku_pipeline(config).run(table)?;
    table.records()
}

/// Read a raw SKU export, process it, and write the cleaned table.
/// Nothing is written if any stage fails.
pub fn process_sku_data(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> PipelineResult<Vec<SkuRecord>> {
    log::info!("Processing SKU data from {}", input.display());
    let mut table = Table::read_file(SKU_TABLE, input)?;
    let records = process_sku_table(&mut table, config)?;
    table.write_file(output)?;
    log::info!("Saved {} SKUs to {}", records.len(), output.display());
    Ok(records)
}

/// Numeric columns of a processed SKU table.
const PROCESSED_SKU_NUMERIC: &[&str] = &[
    col::REVENUE,
    col::COGS,
    col::NET_PROFIT,
    col::UNITS_SOLD,
    col::REFUNDS,
    col::REFUND_RATE_PCT,
    col::AVG_SALE_PRICE,
    col::PROFIT_PER_UNIT,
    col::HEALTH_SCORE,
];

/// Load a previously processed SKU table. Numeric cells go through the
/// cleaner first, so blanks and locale-formatted values read as numbers.
/// Margin and ROI keep a written `NaN`.
pub fn load_processed_skus(path: &Path) -> PipelineResult<Vec<SkuRecord>> {
    let mut table = Table::read_file(SKU_TABLE, path)?;
    CleanNumericColumns {
        required: PROCESSED_SKU_NUMERIC,
        optional: &[col::AMAZON_FEES],
    }
    .apply(&mut table)?;
    for column in [col::MARGIN_PCT, col::ROI_PCT] {
        let values = table.derived_column(column)?;
        table.set_numeric_column(column, &values)?;
    }
    table.records()
}
