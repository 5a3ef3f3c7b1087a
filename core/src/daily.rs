//! Daily-level processing: clean, sort by date, rolling means,
//! calendar fields and daily ratios.

use crate::{
    config::PipelineConfig,
    error::{PipelineError, PipelineResult},
    metrics::{self, rolling_mean},
    stage::{CleanNumericColumns, TablePipeline, TableStage},
    table::Table,
    types::{columns as col, DailyRecord},
};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;

pub const DAILY_TABLE: &str = "daily";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse the date formats found in exports. Time-of-day is dropped.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

fn date_column(table: &Table) -> PipelineResult<Vec<NaiveDate>> {
    table
        .text_column(col::DATE)?
        .into_iter()
        .enumerate()
        .map(|(i, raw)| {
            parse_date(raw).ok_or_else(|| PipelineError::InvalidDate {
                row:   i + 1,
                value: raw.to_string(),
            })
        })
        .collect()
}

/// Normalize Date to `YYYY-MM-DD` and sort rows ascending. Rows with the
/// same date keep their input order.
pub struct SortByDate;

impl TableStage for SortByDate {
    fn name(&self) -> &'static str { "sort_by_date" }

    fn apply(&self, table: &mut Table) -> PipelineResult<()> {
        let dates = date_column(table)?;
        table.set_column(
            col::DATE,
            dates.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect(),
        )?;

        let mut order: Vec<usize> = (0..dates.len()).collect();
        order.sort_by_key(|&i| dates[i]);
        table.reorder_rows(&order);
        Ok(())
    }
}

pub struct RollingAverages {
    pub window: usize,
}

impl TableStage for RollingAverages {
    fn name(&self) -> &'static str { "rolling_averages" }

    fn apply(&self, table: &mut Table) -> PipelineResult<()> {
        for (source, target) in [
            (col::NET_PROFIT, col::PROFIT_7DAY_MA),
            (col::UNITS_SOLD, col::UNITS_7DAY_MA),
            (col::REVENUE, col::REVENUE_7DAY_MA),
        ] {
            let values = table.numeric_column(source)?;
            table.set_numeric_column(target, &rolling_mean(&values, self.window))?;
        }
        Ok(())
    }
}

pub struct CalendarFields;

impl TableStage for CalendarFields {
    fn name(&self) -> &'static str { "calendar_fields" }

    fn apply(&self, table: &mut Table) -> PipelineResult<()> {
        let dates = date_column(table)?;
        table.set_column(
            col::DAY_OF_WEEK,
            dates.iter().map(|&d| metrics::weekday_name(d).to_string()).collect(),
        )?;
        table.set_column(
            col::WEEK_NUMBER,
            dates.iter().map(|&d| metrics::iso_week_number(d).to_string()).collect(),
        )
    }
}

pub struct DailyRatios;

impl TableStage for DailyRatios {
    fn name(&self) -> &'static str { "daily_ratios" }

    fn apply(&self, table: &mut Table) -> PipelineResult<()> {
        let sessions = table.numeric_column(col::SESSIONS)?;
        let orders = table.numeric_column(col::ORDERS)?;
        let profit = table.numeric_column(col::NET_PROFIT)?;
        let revenue = table.numeric_column(col::REVENUE)?;

        let conversion: Vec<f64> = orders
            .iter()
            .zip(&sessions)
            .map(|(&o, &s)| metrics::conversion_rate_pct(o, s))
            .collect();
        let margin: Vec<f64> = profit
            .iter()
            .zip(&revenue)
            .map(|(&p, &r)| metrics::margin_pct(p, r))
            .collect();

        table.set_numeric_column(col::CONVERSION_RATE_PCT, &conversion)?;
        table.set_numeric_column(col::MARGIN_PCT, &margin)
    }
}

pub fn daily_pipeline(config: &PipelineConfig) -> TablePipeline {
    TablePipeline::new(DAILY_TABLE)
        .with_stage(CleanNumericColumns {
            required: &[col::NET_PROFIT, col::UNITS_SOLD, col::REVENUE, col::SESSIONS, col::ORDERS],
            optional: &[],
        })
        .with_stage(SortByDate)
        .with_stage(RollingAverages { window: config.rolling_window })
        .with_stage(CalendarFields)
        .with_stage(DailyRatios)
}

pub fn process_daily_table(table: &mut Table, config: &PipelineConfig) -> PipelineResult<Vec<DailyRecord>> {
    daily_pipeline(config).run(table)?;
    table.records()
}

/// Read a raw daily export, process it, and write the cleaned table.
pub fn process_daily_data(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> PipelineResult<Vec<DailyRecord>> {
    log::info!("Processing daily data from {}", input.display());
    let mut table = Table::read_file(DAILY_TABLE, input)?;
    let records = process_daily_table(&mut table, config)?;
    table.write_file(output)?;
    log::info!("Saved {} daily records to {}", records.len(), output.display());
    Ok(records)
}

const PROCESSED_DAILY_NUMERIC: &[&str] = &[
    col::NET_PROFIT,
    col::UNITS_SOLD,
    col::REVENUE,
    col::SESSIONS,
    col::ORDERS,
    col::PROFIT_7DAY_MA,
    col::UNITS_7DAY_MA,
    col::REVENUE_7DAY_MA,
    col::WEEK_NUMBER,
    col::CONVERSION_RATE_PCT,
    col::MARGIN_PCT,
];

/// Load a previously processed daily table, cleaning numeric cells first.
pub fn load_processed_daily(path: &Path) -> PipelineResult<Vec<DailyRecord>> {
    let mut table = Table::read_file(DAILY_TABLE, path)?;
    CleanNumericColumns {
        required: PROCESSED_DAILY_NUMERIC,
        optional: &[],
    }
    .apply(&mut table)?;
    table.records()
}
