//! File-level runs: raw exports in, processed tables out, summary back.

use sku_health_core::{
    config::PipelineConfig,
    daily::{load_processed_daily, process_daily_data},
    sku::{load_processed_skus, process_sku_data},
    summary::SummaryStats,
    PerformanceTier, PipelineError,
};
use std::fs;

const RAW_SKUS: &str = "\
SKU,Product_Name,Revenue,COGS,Amazon_Fees,Net_Profit,Units_Sold,Refunds
B0A1X,USB Charger Cable,\"5 191,16\",\"-2 000,00\",\"1 500,00\",\"1 691,16\",120,6
B0B2Y,Lavender Perfume,400,300,40,60,12,0
B0C3Z,Mystery Box,,0,0,\"-25,50\",0,2
";

const RAW_DAILY: &str = "\
Date,Net_Profit,Units_Sold,Revenue,Sessions,Orders
2025-04-02,\"1 200,00\",40,\"3 000,00\",800,40
2025-04-01,500,20,1500,400,18
2025-04-03,25.66,72,1091.16,0,0
";

fn config_in(dir: &std::path::Path) -> PipelineConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    PipelineConfig {
        data_dir: dir.to_path_buf(),
        ..PipelineConfig::default()
    }
}

#[test]
fn raw_exports_round_trip_through_processed_files() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(config.raw_sku_path(), RAW_SKUS).unwrap();
    fs::write(config.raw_daily_path(), RAW_DAILY).unwrap();

    let skus = process_sku_data(&config.raw_sku_path(), &config.sku_output_path(), &config).unwrap();
    let daily =
        process_daily_data(&config.raw_daily_path(), &config.daily_output_path(), &config).unwrap();
    assert_eq!(skus.len(), 3);
    assert_eq!(daily.len(), 3);

    let reloaded_skus = load_processed_skus(&config.sku_output_path()).unwrap();
    let reloaded_daily = load_processed_daily(&config.daily_output_path()).unwrap();
    assert_eq!(reloaded_skus, skus);
    assert_eq!(reloaded_daily, daily);

    let tiers: Vec<PerformanceTier> = reloaded_skus.iter().map(|s| s.performance_tier).collect();
    assert_eq!(
        tiers,
        vec![PerformanceTier::Star, PerformanceTier::Strong, PerformanceTier::Weak]
    );

    let stats = SummaryStats::compute(&reloaded_skus, reloaded_daily.len());
    assert!((stats.avg_daily_profit - 575.22).abs() < 1e-6);

    let written = fs::read_to_string(config.sku_output_path()).unwrap();
    assert!(written.starts_with("SKU,Product_Name,Revenue,COGS"));
    assert!(written.contains("SKU-0001,USB Charger Cable,5191.16,-2000,1500,1691.16,120,6"));
    assert!(!written.contains("B0A1X"));
}

#[test]
fn daily_file_sorted_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(config.raw_daily_path(), RAW_DAILY).unwrap();

    process_daily_data(&config.raw_daily_path(), &config.daily_output_path(), &config).unwrap();
    let written = fs::read_to_string(config.daily_output_path()).unwrap();
    let dates: Vec<&str> = written
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(dates, vec!["2025-04-01", "2025-04-02", "2025-04-03"]);
}

#[test]
fn missing_input_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let err = process_sku_data(&config.raw_sku_path(), &config.sku_output_path(), &config)
        .unwrap_err();
    assert!(matches!(err, PipelineError::Io { .. }));
    assert!(err.to_string().contains("raw_sku_data.csv"));
    assert!(!config.sku_output_path().exists());
}

#[test]
fn failed_processing_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(config.raw_sku_path(), "Revenue,COGS\n1,2\n").unwrap();

    let result = process_sku_data(&config.raw_sku_path(), &config.sku_output_path(), &config);
    assert!(matches!(result, Err(PipelineError::MissingColumn { .. })));
    assert!(!config.sku_output_path().exists());
}

#[test]
fn processed_files_with_blank_and_locale_cells_reload() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    fs::write(
        config.sku_output_path(),
        "\
SKU,Revenue,COGS,Amazon_Fees,Net_Profit,Units_Sold,Refunds,Margin_Pct,ROI_Pct,Refund_Rate_Pct,Avg_Sale_Price,Profit_Per_Unit,Category,Health_Score,Performance_Tier
SKU-0001,\"1 234,5\",-600,100,300,,,24.3,50,0,0,0,Drinkware,65,Strong
SKU-0002,inf,0,0,inf,0,0,NaN,0,0,0,0,Other,60,Strong
",
    )
    .unwrap();
    fs::write(
        config.daily_output_path(),
        "\
Date,Net_Profit,Units_Sold,Revenue,Sessions,Orders,Profit_7day_MA,Units_7day_MA,Revenue_7day_MA,Day_of_Week,Week_Number,Conversion_Rate_Pct,Margin_Pct
2025-04-01,\"12,5\",,\"1 000,5\",,3,12.5,,1000.5,Tuesday,14,,1.25
",
    )
    .unwrap();

    let skus = load_processed_skus(&config.sku_output_path()).unwrap();
    assert!((skus[0].revenue - 1234.5).abs() < 1e-9);
    assert_eq!(skus[0].units_sold, 0.0);
    assert_eq!(skus[0].refunds, 0.0);
    assert_eq!(skus[0].health_score, 65);
    assert_eq!(skus[0].performance_tier, PerformanceTier::Strong);
    assert!(skus[1].margin_pct.is_nan());

    let daily = load_processed_daily(&config.daily_output_path()).unwrap();
    assert!((daily[0].net_profit - 12.5).abs() < 1e-9);
    assert!((daily[0].revenue - 1000.5).abs() < 1e-9);
    assert_eq!(daily[0].sessions, 0.0);
    assert_eq!(daily[0].units_7day_ma, 0.0);
    assert_eq!(daily[0].conversion_rate_pct, 0.0);
    assert_eq!(daily[0].week_number, 14);
}
