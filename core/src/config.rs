use crate::{
    categorizer::{self, Categorizer, CategoryRule},
    error::{PipelineError, PipelineResult},
    metrics::DEFAULT_ROLLING_WINDOW,
    scoring::{ScoreTable, TierCutoffs},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File names inside the data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    pub raw_sku:      String,
    pub raw_daily:    String,
    pub sku_output:   String,
    pub daily_output: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            raw_sku:      "raw_sku_data.csv".into(),
            raw_daily:    "raw_daily_data.csv".into(),
            sku_output:   "tableau_sku_data.csv".into(),
            daily_output: "tableau_daily_data.csv".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub data_dir: PathBuf,
    pub files: DataFiles,
    /// Trailing window for the daily moving averages.
    pub rolling_window: usize,
    /// Headers tried, in order, to find the product name.
    pub product_name_columns: Vec<String>,
    /// Ordered keyword rules; first match wins.
    pub categories: Vec<CategoryRule>,
    pub scoring: ScoreTable,
    pub tiers: TierCutoffs,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            files: DataFiles::default(),
            rolling_window: DEFAULT_ROLLING_WINDOW,
            product_name_columns: vec![
                "Product_Name".into(),
                "Product".into(),
                "Title".into(),
                "Name".into(),
            ],
            categories: categorizer::default_rules(),
            scoring: ScoreTable::default(),
            tiers: TierCutoffs::default(),
        }
    }
}

impl PipelineConfig {
    /// Load from a JSON file. Absent fields keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {}: {e}", path.display()))?;
        let config: PipelineConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {}: {e}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        let invalid = |reason: String| PipelineError::InvalidConfig { reason };
        if self.rolling_window == 0 {
            return Err(invalid("rolling_window must be at least 1".into()));
        }
        self.scoring.validate().map_err(invalid)?;
        self.tiers.validate().map_err(invalid)?;
        if let Some(rule) = self.categories.iter().find(|r| r.keywords.iter().any(|k| k.is_empty())) {
            // An empty keyword would match every name.
            return Err(invalid(format!("empty keyword in rule for '{}'", rule.category)));
        }
        Ok(())
    }

    pub fn categorizer(&self) -> Categorizer {
        Categorizer::new(self.categories.clone())
    }

    pub fn raw_sku_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.raw_sku)
    }

    pub fn raw_daily_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.raw_daily)
    }

    pub fn sku_output_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.sku_output)
    }

    pub fn daily_output_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.daily_output)
    }
}
