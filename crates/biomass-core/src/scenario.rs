//! The "imagined future" extrapolation.
//!
//! Humans plateau at a multiple of a reference year's population, livestock+pets go back to
//! the [`BASE_YEAR`] ratio relative to humans, and wildlife returns to its base-year mass. The
//! intermediate waypoints are chosen by hand and only shape the curves towards the final year.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::dataset::BiomassDataset;
use crate::derive::BASE_YEAR;
use crate::error::{AnalysisError, Result};
use crate::series::Year;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub year: Year,
    pub humans_only: f64,
    pub combined: f64,
    pub wildlife: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    /// Year whose humans-only mass is scaled up to the plateau.
    pub reference_year: Year,
    /// World population at `reference_year`, in billions.
    pub reference_population: f64,
    /// Population the world levels out at, in billions.
    pub plateau_population: f64,
    pub final_year: Year,
    pub waypoints: Vec<Waypoint>,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            reference_year: 2000,
            reference_population: 6.0,
            plateau_population: 10.0,
            final_year: 2100,
            waypoints: vec![
                Waypoint {
                    year: 2025,
                    humans_only: 360.0,
                    combined: 1200.0,
                    wildlife: 35.0,
                },
                Waypoint {
                    year: 2050,
                    humans_only: 420.0,
                    combined: 960.0,
                    wildlife: 60.0,
                },
                Waypoint {
                    year: 2075,
                    humans_only: 450.0,
                    combined: 820.0,
                    wildlife: 110.0,
                },
            ],
        }
    }
}

impl ScenarioParams {
    pub fn validate(&self) -> Result<()> {
        if !self.reference_population.is_finite() || self.reference_population <= 0.0 {
            return Err(AnalysisError::Config(format!(
                "reference_population must be positive, got {}",
                self.reference_population
            )));
        }
        if !self.plateau_population.is_finite() || self.plateau_population <= 0.0 {
            return Err(AnalysisError::Config(format!(
                "plateau_population must be positive, got {}",
                self.plateau_population
            )));
        }

        let mut seen = HashSet::new();
        for waypoint in &self.waypoints {
            if waypoint.year >= self.final_year {
                return Err(AnalysisError::Config(format!(
                    "waypoint year {} is not before final_year {}",
                    waypoint.year, self.final_year
                )));
            }
            if !seen.insert(waypoint.year) {
                return Err(AnalysisError::Config(format!(
                    "waypoint year {} is listed more than once",
                    waypoint.year
                )));
            }
        }
        Ok(())
    }
}

/// End state of the scenario, derived from the base dataset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioEstimate {
    pub base_year: Year,
    pub final_year: Year,
    /// `humans_only / combined` at the base year.
    pub initial_humans_ratio: f64,
    pub final_humans_only: f64,
    pub final_combined: f64,
    pub final_wildlife: f64,
}

impl ScenarioEstimate {
    /// Share of humanity's footprint that was livestock+pets in the base year.
    pub fn initial_livestock_share(&self) -> f64 {
        1.0 - self.initial_humans_ratio
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scenario {
    params: ScenarioParams,
}

impl Scenario {
    pub fn new(params: ScenarioParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ScenarioParams {
        &self.params
    }

    pub fn estimate(&self, base: &BiomassDataset) -> Result<ScenarioEstimate> {
        let base_humans = base.humans_only.get(BASE_YEAR)?;
        let base_combined = base.combined.get(BASE_YEAR)?;
        let bases = [
            (&base.humans_only, base_humans),
            (&base.combined, base_combined),
        ];
        for (series, mass) in bases {
            if mass == 0.0 {
                return Err(AnalysisError::ZeroBase {
                    series: series.name().to_string(),
                    year: BASE_YEAR,
                });
            }
        }
        let initial_humans_ratio = base_humans / base_combined;

        let reference_mass = base.humans_only.get(self.params.reference_year)?;
        let final_humans_only =
            (self.params.plateau_population / self.params.reference_population) * reference_mass;
        let final_combined = final_humans_only / initial_humans_ratio;
        let final_wildlife = base.wildlife.get(BASE_YEAR)?;

        debug!(
            final_humans_only,
            final_combined, final_wildlife, "scenario end state estimated"
        );

        Ok(ScenarioEstimate {
            base_year: BASE_YEAR,
            final_year: self.params.final_year,
            initial_humans_ratio,
            final_humans_only,
            final_combined,
            final_wildlife,
        })
    }

    /// Builds the imagined dataset: the base tables overlaid with the waypoints and the
    /// estimated final values. The base dataset is left as is.
    pub fn extend(&self, base: &BiomassDataset) -> Result<BiomassDataset> {
        let estimate = self.estimate(base)?;
        let final_year = self.params.final_year;
        let waypoints = &self.params.waypoints;

        let humans_only = base.humans_only.with_overrides(
            waypoints
                .iter()
                .map(|w| (w.year, w.humans_only))
                .chain([(final_year, estimate.final_humans_only)]),
        );
        let combined = base.combined.with_overrides(
            waypoints
                .iter()
                .map(|w| (w.year, w.combined))
                .chain([(final_year, estimate.final_combined)]),
        );
        let wildlife = base.wildlife.with_overrides(
            waypoints
                .iter()
                .map(|w| (w.year, w.wildlife))
                .chain([(final_year, estimate.final_wildlife)]),
        );

        let imagined = BiomassDataset::new(humans_only, combined, wildlife);
        imagined.validate()?;
        info!(
            years = imagined.wildlife.len(),
            final_year, "imagined dataset built"
        );
        Ok(imagined)
    }
}
