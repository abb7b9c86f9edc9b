use tracing::info;

use crate::config::AnalysisConfig;
use crate::dataset::{maccready_2004, BiomassDataset};
use crate::derive::DerivedTable;
use crate::error::Result;
use crate::figures::{self, FigureSpec};
use crate::report::AnalysisReport;
use crate::scenario::{Scenario, ScenarioEstimate};

/// Everything derived from one dataset and one configuration.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub config: AnalysisConfig,
    pub base: BiomassDataset,
    pub base_table: DerivedTable,
    pub imagined: BiomassDataset,
    pub imagined_table: DerivedTable,
    pub estimate: ScenarioEstimate,
}

impl Analysis {
    /// Runs the derivations over the built-in dataset.
    pub fn run(config: AnalysisConfig) -> Result<Self> {
        Self::with_dataset(config, maccready_2004().clone())
    }

    pub fn with_dataset(config: AnalysisConfig, base: BiomassDataset) -> Result<Self> {
        base.validate()?;
        let scenario = Scenario::new(config.scenario.clone())?;

        let base_table = DerivedTable::from_dataset(&base)?;
        let estimate = scenario.estimate(&base)?;
        let imagined = scenario.extend(&base)?;
        let imagined_table = DerivedTable::from_dataset(&imagined)?;

        info!(
            base_years = base_table.rows().len(),
            imagined_years = imagined_table.rows().len(),
            "analysis prepared"
        );

        Ok(Self {
            config,
            base,
            base_table,
            imagined,
            imagined_table,
            estimate,
        })
    }

    pub fn report(&self) -> Result<AnalysisReport> {
        AnalysisReport::build(
            &self.base,
            &self.base_table,
            self.estimate,
            self.config.observed_year,
            self.config.projected_year,
        )
    }

    pub fn figures(&self) -> Vec<FigureSpec> {
        figures::catalogue(
            &self.base_table,
            &self.imagined_table,
            &self.config.figure_options(),
        )
    }

    pub fn table(&self, imagined: bool) -> &DerivedTable {
        if imagined {
            &self.imagined_table
        } else {
            &self.base_table
        }
    }
}
