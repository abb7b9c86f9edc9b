use once_cell::sync::Lazy;
use serde::Serialize;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::series::{MassSeries, SeriesKind, Year};

/// The three input series of the analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BiomassDataset {
    pub humans_only: MassSeries,
    pub combined: MassSeries,
    pub wildlife: MassSeries,
}

impl BiomassDataset {
    pub fn new(humans_only: MassSeries, combined: MassSeries, wildlife: MassSeries) -> Self {
        Self {
            humans_only,
            combined,
            wildlife,
        }
    }

    /// Years of the dataset, taken from the wildlife series.
    pub fn years(&self) -> Vec<Year> {
        self.wildlife.years().collect()
    }

    /// Checks that all three series cover the same years and that combined mass never falls
    /// below humans-only mass.
    pub fn validate(&self) -> Result<()> {
        for series in [&self.humans_only, &self.combined, &self.wildlife] {
            if series.is_empty() {
                return Err(AnalysisError::EmptySeries(series.name().to_string()));
            }
        }

        let pairs = [
            (&self.wildlife, &self.humans_only),
            (&self.wildlife, &self.combined),
        ];
        for (left, right) in pairs {
            if let Some(year) = left
                .years()
                .find(|year| !right.contains(*year))
                .or_else(|| right.years().find(|year| !left.contains(*year)))
            {
                return Err(AnalysisError::KeyMismatch {
                    left: left.name().to_string(),
                    right: right.name().to_string(),
                    year,
                });
            }
        }

        for year in self.years() {
            let combined = self.combined.get(year)?;
            let humans_only = self.humans_only.get(year)?;
            if combined < humans_only {
                return Err(AnalysisError::NegativeLivestock {
                    year,
                    combined,
                    humans_only,
                });
            }
        }

        debug!(years = self.wildlife.len(), "dataset validated");
        Ok(())
    }
}

// Eyeballed off MacCready, "The Case for Battery Electric Vehicles" (2004), p. 230.
static MACCREADY_2004: Lazy<BiomassDataset> = Lazy::new(|| {
    const YEARS: [Year; 12] = [
        1850, 1875, 1900, 1910, 1925, 1940, 1950, 1962, 1975, 2000, 2025, 2050,
    ];
    const HUMANS_ONLY: [f64; 12] = [
        60.0, 70.0, 90.0, 95.0, 105.0, 125.0, 135.0, 170.0, 210.0, 290.0, 420.0, 570.0,
    ];
    const COMBINED: [f64; 12] = [
        95.0, 110.0, 135.0, 155.0, 200.0, 255.0, 315.0, 445.0, 665.0, 1200.0, 1935.0, 2700.0,
    ];
    const WILDLIFE: [f64; 12] = [
        205.0, 190.0, 175.0, 165.0, 140.0, 130.0, 115.0, 90.0, 75.0, 30.0, 20.0, 10.0,
    ];

    BiomassDataset::new(
        MassSeries::new(SeriesKind::HumansOnly, YEARS.into_iter().zip(HUMANS_ONLY)),
        MassSeries::new(SeriesKind::Combined, YEARS.into_iter().zip(COMBINED)),
        MassSeries::new(SeriesKind::Wildlife, YEARS.into_iter().zip(WILDLIFE)),
    )
});

/// The built-in transcription the analysis is based on.
pub fn maccready_2004() -> &'static BiomassDataset {
    &MACCREADY_2004
}
