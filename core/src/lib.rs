//! Sales-export cleaning, SKU health scoring and summary reporting.
//!
//! A raw SKU export and a raw daily export each pass through a fixed
//! `TablePipeline`; the processed tables feed `SummaryStats`.

pub mod categorizer;
pub mod cleaner;
pub mod config;
pub mod daily;
pub mod error;
pub mod metrics;
pub mod report;
pub mod scoring;
pub mod sku;
pub mod stage;
pub mod summary;
pub mod table;
pub mod types;

pub use categorizer::assign_category;
pub use cleaner::clean_european_number;
pub use config::PipelineConfig;
pub use error::{PipelineError, PipelineResult};
pub use report::{run_report, ReportOutcome};
pub use scoring::{assign_performance_tier, calculate_health_score, HealthSignals};
pub use summary::SummaryStats;
pub use types::{Category, DailyRecord, PerformanceTier, SkuRecord};
