//! Summary statistics over processed SKU rows.
//!
//! Computation and rendering are separate: `SummaryStats::compute`
//! builds a serializable value, `Display` renders the console report.

use crate::types::{Category, PerformanceTier, SkuRecord};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category:   Category,
    pub net_profit: f64,
    /// Share of total net profit, 0 when the total is 0.
    pub share_pct:  f64,
    pub sku_count:  usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierStat {
    pub tier:      PerformanceTier,
    pub count:     usize,
    pub share_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_net_profit: f64,
    pub total_units_sold: f64,
    pub total_revenue:    f64,
    pub avg_margin_pct:   f64,
    pub active_skus:      usize,
    pub daily_records:    usize,
    pub avg_daily_profit: f64,
    /// Sorted by net profit, highest first, then by label.
    pub categories:       Vec<CategoryStat>,
    /// Star, Strong, Average, Weak; tiers with no SKUs are omitted.
    pub tiers:            Vec<TierStat>,
}

fn share(part: f64, total: f64) -> f64 {
    if total != 0.0 { part / total * 100.0 } else { 0.0 }
}

impl SummaryStats {
    pub fn compute(skus: &[SkuRecord], daily_records: usize) -> Self {
        let total_net_profit: f64 = skus.iter().map(|s| s.net_profit).sum();
        let total_units_sold: f64 = skus.iter().map(|s| s.units_sold).sum();
        let total_revenue: f64 = skus.iter().map(|s| s.revenue).sum();

        let avg_daily_profit = if daily_records > 0 {
            total_net_profit / daily_records as f64
        } else {
            0.0
        };

        let mut by_category: BTreeMap<Category, (f64, usize)> = BTreeMap::new();
        for sku in skus {
            let entry = by_category.entry(sku.category).or_default();
            entry.0 += sku.net_profit;
            entry.1 += 1;
        }
        let mut categories: Vec<CategoryStat> = by_category
            .into_iter()
            .map(|(category, (net_profit, sku_count))| CategoryStat {
                category,
                net_profit,
                share_pct: share(net_profit, total_net_profit),
                sku_count,
            })
            .collect();
        // Ties fall back to label order.
        categories.sort_by(|a, b| {
            b.net_profit
                .total_cmp(&a.net_profit)
                .then_with(|| a.category.label().cmp(b.category.label()))
        });

        let tiers = PerformanceTier::ALL
            .into_iter()
            .filter_map(|tier| {
                let count = skus.iter().filter(|s| s.performance_tier == tier).count();
                (count > 0).then(|| TierStat {
                    tier,
                    count,
                    share_pct: share(count as f64, skus.len() as f64),
                })
            })
            .collect();

        Self {
            total_net_profit,
            total_units_sold,
            total_revenue,
            avg_margin_pct: share(total_net_profit, total_revenue),
            active_skus: skus.len(),
            daily_records,
            avg_daily_profit,
            categories,
            tiers,
        }
    }
}

/// Group the integer part of `value` with commas: `1234567.891` with two
/// decimals becomes `1,234,567.89`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let is_zero = fixed.chars().all(|c| c == '0' || c == '.');
    if value < 0.0 && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

pub fn format_money(value: f64) -> String {
    format!("${}", format_thousands(value, 2))
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "=".repeat(60);
        writeln!(f)?;
        writeln!(f, "{rule}")?;
        writeln!(f, "SUMMARY STATISTICS")?;
        writeln!(f, "{rule}")?;

        writeln!(f)?;
        writeln!(f, "Total Net Profit: {}", format_money(self.total_net_profit))?;
        writeln!(f, "Total Units Sold: {}", format_thousands(self.total_units_sold.trunc(), 0))?;
        writeln!(f, "Total Revenue: {}", format_money(self.total_revenue))?;
        writeln!(f, "Average Margin: {:.1}%", self.avg_margin_pct)?;
        writeln!(f, "Active SKUs: {}", self.active_skus)?;
        writeln!(f, "Avg Daily Profit: ${:.2}", self.avg_daily_profit)?;

        writeln!(f)?;
        writeln!(f, "Category Performance:")?;
        for c in &self.categories {
            writeln!(
                f,
                "  {}: {} ({:.1}%) - {} SKUs",
                c.category,
                format_money(c.net_profit),
                c.share_pct,
                c.sku_count
            )?;
        }

        writeln!(f)?;
        writeln!(f, "Performance Tier Distribution:")?;
        for t in &self.tiers {
            writeln!(f, "  {}: {} ({:.0}%)", t.tier, t.count, t.share_pct)?;
        }
        Ok(())
    }
}
