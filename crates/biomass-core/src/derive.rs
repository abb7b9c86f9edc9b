use serde::Serialize;
use tracing::debug;

use crate::dataset::BiomassDataset;
use crate::error::{AnalysisError, Result};
use crate::series::{MassSeries, SeriesKind, Year};

/// Year every relative change is measured against.
pub const BASE_YEAR: Year = 1850;

/// Livestock+pets mass, `combined - humans_only`, at every year of the dataset.
pub fn livestock_and_pets(dataset: &BiomassDataset) -> Result<MassSeries> {
    let mut points = Vec::with_capacity(dataset.wildlife.len());

    for year in dataset.years() {
        let combined = dataset.combined.get(year)?;
        let humans_only = dataset.humans_only.get(year)?;
        if combined < humans_only {
            return Err(AnalysisError::NegativeLivestock {
                year,
                combined,
                humans_only,
            });
        }
        points.push((year, combined - humans_only));
    }

    Ok(MassSeries::new(SeriesKind::LivestockAndPets, points))
}

/// Ratio of the value at `end_year` to the value at [`BASE_YEAR`].
pub fn find_change(series: &MassSeries, end_year: Year) -> Result<f64> {
    let base = series.get(BASE_YEAR)?;
    let end = series.get(end_year)?;
    if base == 0.0 {
        return Err(AnalysisError::ZeroBase {
            series: series.name().to_string(),
            year: BASE_YEAR,
        });
    }
    Ok(end / base)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedRow {
    pub year: Year,
    pub humans_only: f64,
    pub combined: f64,
    pub wildlife: f64,
    pub livestock_and_pets: f64,
    pub total: f64,
    pub combined_share: f64,
    pub humans_only_share: f64,
    pub livestock_and_pets_share: f64,
    pub wildlife_share: f64,
}

impl DerivedRow {
    fn compute(year: Year, humans_only: f64, combined: f64, wildlife: f64) -> Result<Self> {
        let livestock_and_pets = combined - humans_only;
        if livestock_and_pets < 0.0 {
            return Err(AnalysisError::NegativeLivestock {
                year,
                combined,
                humans_only,
            });
        }

        let total = combined + wildlife;
        if total == 0.0 {
            return Err(AnalysisError::ZeroTotal { year });
        }

        Ok(Self {
            year,
            humans_only,
            combined,
            wildlife,
            livestock_and_pets,
            total,
            combined_share: combined / total,
            humans_only_share: humans_only / total,
            livestock_and_pets_share: livestock_and_pets / total,
            wildlife_share: wildlife / total,
        })
    }
}

/// Every input and derived quantity of a dataset, one row per year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedTable {
    rows: Vec<DerivedRow>,
}

impl DerivedTable {
    pub fn from_dataset(dataset: &BiomassDataset) -> Result<Self> {
        let years = dataset.years();
        if years.is_empty() {
            return Err(AnalysisError::EmptySeries(
                dataset.wildlife.name().to_string(),
            ));
        }

        let rows = years
            .iter()
            .map(|&year| {
                DerivedRow::compute(
                    year,
                    dataset.humans_only.get(year)?,
                    dataset.combined.get(year)?,
                    dataset.wildlife.get(year)?,
                )
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(rows = rows.len(), "derived table computed");
        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn years(&self) -> Vec<Year> {
        self.rows.iter().map(|row| row.year).collect()
    }

    pub fn column(&self, select: impl Fn(&DerivedRow) -> f64) -> Vec<f64> {
        self.rows.iter().map(select).collect()
    }

    pub fn livestock_and_pets(&self) -> MassSeries {
        MassSeries::new(
            SeriesKind::LivestockAndPets,
            self.rows.iter().map(|row| (row.year, row.livestock_and_pets)),
        )
    }

    /// Combined share and its complement, bottom band first.
    pub fn two_band_shares(&self) -> [Vec<f64>; 2] {
        let combined = self.column(|row| row.combined_share);
        let rest = combined.iter().map(|share| 1.0 - share).collect();
        [combined, rest]
    }

    /// Humans-only, livestock+pets and wildlife shares, bottom band first.
    pub fn three_band_shares(&self) -> [Vec<f64>; 3] {
        [
            self.column(|row| row.humans_only_share),
            self.column(|row| row.livestock_and_pets_share),
            self.column(|row| row.wildlife_share),
        ]
    }
}
