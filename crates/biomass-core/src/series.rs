use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// Calendar year used as the key of every series.
pub type Year = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesKind {
    HumansOnly,
    Combined,
    Wildlife,
    LivestockAndPets,
}

impl SeriesKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeriesKind::HumansOnly => "humans_only",
            SeriesKind::Combined => "combined",
            SeriesKind::Wildlife => "wildlife",
            SeriesKind::LivestockAndPets => "livestock_and_pets",
        }
    }

    /// Human readable label used in legends and report lines.
    pub fn label(&self) -> &'static str {
        match self {
            SeriesKind::HumansOnly => "Humans Only",
            SeriesKind::Combined => "Humans+Livestock+Pets",
            SeriesKind::Wildlife => "Wildlife",
            SeriesKind::LivestockAndPets => "Livestock+Pets",
        }
    }
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mass in millions of tons keyed by year, always iterated in year order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MassSeries {
    kind: SeriesKind,
    points: BTreeMap<Year, f64>,
}

impl MassSeries {
    pub fn new(kind: SeriesKind, points: impl IntoIterator<Item = (Year, f64)>) -> Self {
        Self {
            kind,
            points: points.into_iter().collect(),
        }
    }

    pub fn kind(&self) -> SeriesKind {
        self.kind
    }

    pub fn name(&self) -> &'static str {
        self.kind.as_str()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn contains(&self, year: Year) -> bool {
        self.points.contains_key(&year)
    }

    pub fn get(&self, year: Year) -> Result<f64> {
        self.points
            .get(&year)
            .copied()
            .ok_or_else(|| AnalysisError::MissingYear {
                series: self.name().to_string(),
                year,
            })
    }

    pub fn years(&self) -> impl Iterator<Item = Year> + '_ {
        self.points.keys().copied()
    }

    pub fn points(&self) -> impl Iterator<Item = (Year, f64)> + '_ {
        self.points.iter().map(|(year, mass)| (*year, *mass))
    }

    pub fn first(&self) -> Option<(Year, f64)> {
        self.points.iter().next().map(|(year, mass)| (*year, *mass))
    }

    pub fn last(&self) -> Option<(Year, f64)> {
        self.points.iter().next_back().map(|(year, mass)| (*year, *mass))
    }

    /// Returns a new series where `overrides` replace or add points. `self` is untouched.
    pub fn with_overrides(&self, overrides: impl IntoIterator<Item = (Year, f64)>) -> Self {
        let mut points = self.points.clone();
        points.extend(overrides);
        Self {
            kind: self.kind,
            points,
        }
    }

    /// Looks up every year in `years`, failing on the first one that is absent.
    pub fn values_at(&self, years: &[Year]) -> Result<Vec<f64>> {
        years.iter().map(|year| self.get(*year)).collect()
    }
}
