//! Stage trait and pipeline.
//!
//! RULE: Every transform step implements TableStage.
//! A pipeline applies its stages in registration order, once per table.
//! Stages only communicate through the columns they write.

use crate::{error::PipelineResult, table::Table};

/// The contract every transform step must fulfill.
pub trait TableStage {
    /// Unique stable name for this stage.
    fn name(&self) -> &'static str;

    /// Transform the whole table in place.
    fn apply(&self, table: &mut Table) -> PipelineResult<()>;
}

/// Ordered list of stages for one table kind.
pub struct TablePipeline {
    label:  &'static str,
    stages: Vec<Box<dyn TableStage>>,
}

impl TablePipeline {
    pub fn new(label: &'static str) -> Self {
        Self { label, stages: Vec::new() }
    }

    pub fn with_stage(mut self, stage: impl TableStage + 'static) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    /// Run every stage. Stops at the first failing stage; the table is
    /// then partially transformed and must not be written.
    pub fn run(&self, table: &mut Table) -> PipelineResult<()> {
        for stage in &self.stages {
            log::debug!("{}: stage '{}' on {} rows", self.label, stage.name(), table.len());
            stage.apply(table)?;
        }
        Ok(())
    }
}

/// Clean locale-formatted numeric columns in place.
pub struct CleanNumericColumns {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl TableStage for CleanNumericColumns {
    fn name(&self) -> &'static str { "clean_numeric" }

    fn apply(&self, table: &mut Table) -> PipelineResult<()> {
        for &column in self.required {
            table.require_column(column)?;
        }
        let present: Vec<&str> = self
            .optional
            .iter()
            .copied()
            .filter(|c| table.has_column(c))
            .collect();
        for column in self.required.iter().copied().chain(present) {
            let coerced = table.clean_numeric_column(column)?;
            if coerced > 0 {
                log::warn!("{}: {coerced} unparseable '{column}' cells coerced to 0", table.label);
            }
        }
        Ok(())
    }
}
