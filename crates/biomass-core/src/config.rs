// crates/biomass-core/src/config.rs

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AnalysisError, Result};
use crate::figures::{FigureOptions, Underlay};
use crate::scenario::ScenarioParams;
use crate::series::Year;

pub const OUTPUT_DIR_ENV: &str = "BIOMASS_OUTPUT_DIR";
pub const UNDERLAY_ENV: &str = "BIOMASS_UNDERLAY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub output_dir: PathBuf,
    /// Scan of the source chart drawn behind the calibration figure.
    pub underlay: Option<PathBuf>,
    pub underlay_resolution: (u32, u32),
    pub underlay_opacity: f64,
    pub chart_size: (u32, u32),
    pub calibration_size: (u32, u32),
    pub observed_year: Year,
    pub projected_year: Year,
    pub scenario: ScenarioParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            underlay: None,
            underlay_resolution: (200, 120),
            underlay_opacity: 0.5,
            chart_size: (1200, 600),
            calibration_size: (1500, 1000),
            observed_year: 2000,
            projected_year: 2050,
            scenario: ScenarioParams::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Reads `path` when given, otherwise starts from the defaults. Environment overrides are
    /// applied afterwards.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup(OUTPUT_DIR_ENV).filter(|v| !v.is_empty()) {
            debug!(%dir, "output directory overridden from environment");
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(underlay) = lookup(UNDERLAY_ENV).filter(|v| !v.is_empty()) {
            debug!(%underlay, "underlay overridden from environment");
            self.underlay = Some(PathBuf::from(underlay));
        }
    }

    pub fn validate(&self) -> Result<()> {
        for (name, (width, height)) in [
            ("chart_size", self.chart_size),
            ("calibration_size", self.calibration_size),
            ("underlay_resolution", self.underlay_resolution),
        ] {
            if width == 0 || height == 0 {
                return Err(AnalysisError::Config(format!(
                    "{name} must be non-zero, got {width}x{height}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.underlay_opacity) {
            return Err(AnalysisError::Config(format!(
                "underlay_opacity must be within 0..=1, got {}",
                self.underlay_opacity
            )));
        }
        self.scenario.validate()
    }

    pub fn figure_options(&self) -> FigureOptions {
        FigureOptions {
            chart_size: self.chart_size,
            calibration_size: self.calibration_size,
            underlay: self.underlay.as_ref().map(|path| Underlay {
                path: path.clone(),
                opacity: self.underlay_opacity,
                resolution: self.underlay_resolution,
            }),
        }
    }
}
