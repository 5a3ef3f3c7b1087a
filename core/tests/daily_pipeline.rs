//! Daily pipeline: date sorting, rolling means, calendar fields, ratios.

use sku_health_core::{
    config::PipelineConfig,
    daily::{process_daily_table, DAILY_TABLE},
    table::Table,
};

fn daily_csv(days: &[(&str, f64)]) -> String {
    let mut csv = String::from("Date,Net_Profit,Units_Sold,Revenue,Sessions,Orders\n");
    for (date, profit) in days {
        csv.push_str(&format!("{date},{profit},1,100,50,5\n"));
    }
    csv
}

#[test]
fn rows_sorted_by_date() {
    let csv = daily_csv(&[("2025-04-03", 3.0), ("2025-04-01", 1.0), ("2025-04-02", 2.0)]);
    let mut table = Table::read(DAILY_TABLE, csv.as_bytes()).unwrap();
    let records = process_daily_table(&mut table, &PipelineConfig::default()).unwrap();

    let profits: Vec<f64> = records.iter().map(|r| r.net_profit).collect();
    assert_eq!(profits, vec![1.0, 2.0, 3.0]);
    assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn rolling_mean_uses_available_days_then_seven() {
    let days: Vec<(String, f64)> = (1..=10)
        .map(|d| (format!("2025-04-{d:02}"), d as f64))
        .collect();
    let refs: Vec<(&str, f64)> = days.iter().map(|(d, p)| (d.as_str(), *p)).collect();
    let mut table = Table::read(DAILY_TABLE, daily_csv(&refs).as_bytes()).unwrap();
    let records = process_daily_table(&mut table, &PipelineConfig::default()).unwrap();

    assert!((records[0].profit_7day_ma - 1.0).abs() < 1e-9);
    assert!((records[2].profit_7day_ma - 2.0).abs() < 1e-9);
    assert!((records[6].profit_7day_ma - 4.0).abs() < 1e-9);
    // Days 4..=10
    assert!((records[9].profit_7day_ma - 7.0).abs() < 1e-9);
    assert!(records.iter().all(|r| (r.units_7day_ma - 1.0).abs() < 1e-9));
    assert!(records.iter().all(|r| (r.revenue_7day_ma - 100.0).abs() < 1e-9));
}

#[test]
fn configurable_window() {
    let csv = daily_csv(&[("2025-04-01", 2.0), ("2025-04-02", 4.0), ("2025-04-03", 8.0)]);
    let mut config = PipelineConfig::default();
    config.rolling_window = 2;
    let mut table = Table::read(DAILY_TABLE, csv.as_bytes()).unwrap();
    let records = process_daily_table(&mut table, &config).unwrap();
    assert!((records[2].profit_7day_ma - 6.0).abs() < 1e-9);
}

#[test]
fn calendar_fields_and_normalized_dates() {
    let csv = daily_csv(&[("06.04.2025", 1.0), ("2025/04/07", 1.0)]);
    let mut table = Table::read(DAILY_TABLE, csv.as_bytes()).unwrap();
    let records = process_daily_table(&mut table, &PipelineConfig::default()).unwrap();

    assert_eq!(records[0].day_of_week, "Sunday");
    assert_eq!(records[0].week_number, 14);
    assert_eq!(records[1].day_of_week, "Monday");
    assert_eq!(records[1].week_number, 15);
    assert_eq!(table.text_column("Date").unwrap(), vec!["2025-04-06", "2025-04-07"]);
}

#[test]
fn conversion_and_margin_guarded() {
    let csv = "\
Date,Net_Profit,Units_Sold,Revenue,Sessions,Orders
2025-04-01,25,3,\"1 000,00\",200,10
2025-04-02,-5,0,0,0,0
";
    let mut table = Table::read(DAILY_TABLE, csv.as_bytes()).unwrap();
    let records = process_daily_table(&mut table, &PipelineConfig::default()).unwrap();

    assert!((records[0].conversion_rate_pct - 5.0).abs() < 1e-9);
    assert!((records[0].margin_pct - 2.5).abs() < 1e-9);
    assert_eq!(records[1].conversion_rate_pct, 0.0);
    assert_eq!(records[1].margin_pct, 0.0);
}

#[test]
fn derived_column_order() {
    let csv = daily_csv(&[("2025-04-01", 1.0)]);
    let mut table = Table::read(DAILY_TABLE, csv.as_bytes()).unwrap();
    process_daily_table(&mut table, &PipelineConfig::default()).unwrap();
    assert_eq!(
        &table.headers()[6..],
        &[
            "Profit_7day_MA", "Units_7day_MA", "Revenue_7day_MA", "Day_of_Week",
            "Week_Number", "Conversion_Rate_Pct", "Margin_Pct",
        ]
    );
}
