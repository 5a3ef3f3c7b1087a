//! Derived ratios, rolling means and calendar fields.
//!
//! Every ratio returns 0 when its denominator is not positive.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::VecDeque;

pub const DEFAULT_ROLLING_WINDOW: usize = 7;

/// `numerator / denominator * scale`, or 0 unless `denominator > 0`.
pub fn guarded_ratio(numerator: f64, denominator: f64, scale: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator * scale
    } else {
        0.0
    }
}

pub fn margin_pct(net_profit: f64, revenue: f64) -> f64 {
    guarded_ratio(net_profit, revenue, 100.0)
}

/// ROI against the absolute cost of goods; COGS is often exported negative.
pub fn roi_pct(net_profit: f64, cogs: f64) -> f64 {
    guarded_ratio(net_profit, cogs.abs(), 100.0)
}

pub fn refund_rate_pct(refunds: f64, units_sold: f64) -> f64 {
    guarded_ratio(refunds, units_sold, 100.0)
}

pub fn avg_sale_price(revenue: f64, units_sold: f64) -> f64 {
    guarded_ratio(revenue, units_sold, 1.0)
}

pub fn profit_per_unit(net_profit: f64, units_sold: f64) -> f64 {
    guarded_ratio(net_profit, units_sold, 1.0)
}

pub fn conversion_rate_pct(orders: f64, sessions: f64) -> f64 {
    guarded_ratio(orders, sessions, 100.0)
}

/// Per-SKU ratios derived from the cleaned base columns.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SkuRatios {
    pub margin_pct: f64,
    pub roi_pct: f64,
    pub refund_rate_pct: f64,
    pub avg_sale_price: f64,
    pub profit_per_unit: f64,
}

impl SkuRatios {
    pub fn derive(revenue: f64, cogs: f64, net_profit: f64, units_sold: f64, refunds: f64) -> Self {
        Self {
            margin_pct: margin_pct(net_profit, revenue),
            roi_pct: roi_pct(net_profit, cogs),
            refund_rate_pct: refund_rate_pct(refunds, units_sold),
            avg_sale_price: avg_sale_price(revenue, units_sold),
            profit_per_unit: profit_per_unit(net_profit, units_sold),
        }
    }
}

/// Trailing mean over at most `window` values, emitting from the first
/// sample onward (minimum one observation).
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    let mut buffer: VecDeque<f64> = VecDeque::with_capacity(window);
    let mut sum = 0.0;
    let mut out = Vec::with_capacity(values.len());

    for &v in values {
        if buffer.len() == window {
            if let Some(old) = buffer.pop_front() {
                sum -= old;
            }
        }
        buffer.push_back(v);
        sum += v;
        out.push(sum / buffer.len() as f64);
    }
    out
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}
