//! Shared record and label types used across the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column names shared by the SKU and daily tables.
pub mod columns {
    pub const SKU: &str = "SKU";
    pub const REVENUE: &str = "Revenue";
    pub const COGS: &str = "COGS";
    pub const AMAZON_FEES: &str = "Amazon_Fees";
    pub const NET_PROFIT: &str = "Net_Profit";
    pub const UNITS_SOLD: &str = "Units_Sold";
    pub const REFUNDS: &str = "Refunds";
    pub const CATEGORY: &str = "Category";
    pub const MARGIN_PCT: &str = "Margin_Pct";
    pub const ROI_PCT: &str = "ROI_Pct";
    pub const REFUND_RATE_PCT: &str = "Refund_Rate_Pct";
    pub const AVG_SALE_PRICE: &str = "Avg_Sale_Price";
    pub const PROFIT_PER_UNIT: &str = "Profit_Per_Unit";
    pub const HEALTH_SCORE: &str = "Health_Score";
    pub const PERFORMANCE_TIER: &str = "Performance_Tier";

    pub const DATE: &str = "Date";
    pub const SESSIONS: &str = "Sessions";
    pub const ORDERS: &str = "Orders";
    pub const PROFIT_7DAY_MA: &str = "Profit_7day_MA";
    pub const UNITS_7DAY_MA: &str = "Units_7day_MA";
    pub const REVENUE_7DAY_MA: &str = "Revenue_7day_MA";
    pub const DAY_OF_WEEK: &str = "Day_of_Week";
    pub const WEEK_NUMBER: &str = "Week_Number";
    pub const CONVERSION_RATE_PCT: &str = "Conversion_Rate_Pct";
}

/// Product category. The label set is fixed; only the keywords that
/// select a label are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Electronics & Home")]
    ElectronicsHome,
    #[serde(rename = "Fragrances")]
    Fragrances,
    #[serde(rename = "Beauty & Skincare")]
    BeautySkincare,
    #[serde(rename = "Consumables & Health")]
    ConsumablesHealth,
    #[serde(rename = "Collectibles & Toys")]
    CollectiblesToys,
    #[serde(rename = "Apparel & Footwear")]
    ApparelFootwear,
    #[serde(rename = "Drinkware")]
    Drinkware,
    #[serde(rename = "Sports")]
    Sports,
    #[serde(rename = "Media & Entertainment")]
    MediaEntertainment,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::ElectronicsHome,
        Category::Fragrances,
        Category::BeautySkincare,
        Category::ConsumablesHealth,
        Category::CollectiblesToys,
        Category::ApparelFootwear,
        Category::Drinkware,
        Category::Sports,
        Category::MediaEntertainment,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::ElectronicsHome    => "Electronics & Home",
            Category::Fragrances         => "Fragrances",
            Category::BeautySkincare     => "Beauty & Skincare",
            Category::ConsumablesHealth  => "Consumables & Health",
            Category::CollectiblesToys   => "Collectibles & Toys",
            Category::ApparelFootwear    => "Apparel & Footwear",
            Category::Drinkware          => "Drinkware",
            Category::Sports             => "Sports",
            Category::MediaEntertainment => "Media & Entertainment",
            Category::Other              => "Other",
        }
    }

    /// Exact label lookup, as written by this pipeline.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Discrete tier derived from a health score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PerformanceTier {
    Star,
    Strong,
    Average,
    Weak,
}

impl PerformanceTier {
    /// Reporting order, best first.
    pub const ALL: [PerformanceTier; 4] = [
        PerformanceTier::Star,
        PerformanceTier::Strong,
        PerformanceTier::Average,
        PerformanceTier::Weak,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PerformanceTier::Star    => "Star",
            PerformanceTier::Strong  => "Strong",
            PerformanceTier::Average => "Average",
            PerformanceTier::Weak    => "Weak",
        }
    }
}

impl fmt::Display for PerformanceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One processed SKU row, as it appears in the SKU output table.
/// Input columns that are not listed here are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkuRecord {
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "COGS")]
    pub cogs: f64,
    #[serde(rename = "Amazon_Fees", default)]
    pub amazon_fees: f64,
    #[serde(rename = "Net_Profit")]
    pub net_profit: f64,
    #[serde(rename = "Units_Sold")]
    pub units_sold: f64,
    #[serde(rename = "Refunds")]
    pub refunds: f64,
    #[serde(rename = "Margin_Pct")]
    pub margin_pct: f64,
    #[serde(rename = "ROI_Pct")]
    pub roi_pct: f64,
    #[serde(rename = "Refund_Rate_Pct")]
    pub refund_rate_pct: f64,
    #[serde(rename = "Avg_Sale_Price")]
    pub avg_sale_price: f64,
    #[serde(rename = "Profit_Per_Unit")]
    pub profit_per_unit: f64,
    #[serde(rename = "Category")]
    pub category: Category,
    #[serde(rename = "Health_Score")]
    pub health_score: u8,
    #[serde(rename = "Performance_Tier")]
    pub performance_tier: PerformanceTier,
}

/// One processed day, as it appears in the daily output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(rename = "Date")]
    pub date: chrono::NaiveDate,
    #[serde(rename = "Net_Profit")]
    pub net_profit: f64,
    #[serde(rename = "Units_Sold")]
    pub units_sold: f64,
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    #[serde(rename = "Sessions")]
    pub sessions: f64,
    #[serde(rename = "Orders")]
    pub orders: f64,
    #[serde(rename = "Profit_7day_MA")]
    pub profit_7day_ma: f64,
    #[serde(rename = "Units_7day_MA")]
    pub units_7day_ma: f64,
    #[serde(rename = "Revenue_7day_MA")]
    pub revenue_7day_ma: f64,
    #[serde(rename = "Day_of_Week")]
    pub day_of_week: String,
    #[serde(rename = "Week_Number")]
    pub week_number: u32,
    #[serde(rename = "Conversion_Rate_Pct")]
    pub conversion_rate_pct: f64,
    #[serde(rename = "Margin_Pct")]
    pub margin_pct: f64,
}
