use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use serde::Serialize;

use crate::dataset::BiomassDataset;
use crate::derive::{find_change, DerivedTable, BASE_YEAR};
use crate::error::Result;
use crate::scenario::ScenarioEstimate;
use crate::series::{MassSeries, SeriesKind, Year};

/// Whether a change is reported as already happened or as a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outlook {
    Observed,
    Projected,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChangeLine {
    pub kind: SeriesKind,
    pub end_year: Year,
    /// `series[end_year] / series[1850]`.
    pub ratio: f64,
    pub outlook: Outlook,
}

impl ChangeLine {
    pub fn percent(&self) -> f64 {
        self.ratio * 100.0
    }

    pub fn sentence(&self) -> String {
        // Plural labels take the plural verb.
        let plural = !matches!(self.kind, SeriesKind::Wildlife);
        let verb = match (self.outlook, plural) {
            (Outlook::Observed, true) => "are now",
            (Outlook::Observed, false) => "is now",
            (Outlook::Projected, true) => "become",
            (Outlook::Projected, false) => "becomes",
        };
        format!(
            "{} {} {:.0}% of original value",
            self.kind.label(),
            verb,
            self.percent()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChangeReport {
    pub end_year: Year,
    pub lines: Vec<ChangeLine>,
}

impl ChangeReport {
    pub fn compute(
        dataset: &BiomassDataset,
        livestock: &MassSeries,
        end_year: Year,
        outlook: Outlook,
    ) -> Result<Self> {
        let series = [&dataset.humans_only, livestock, &dataset.wildlife];
        let lines = series
            .into_iter()
            .map(|series| {
                Ok(ChangeLine {
                    kind: series.kind(),
                    end_year,
                    ratio: find_change(series, end_year)?,
                    outlook,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { end_year, lines })
    }

    pub fn sentences(&self) -> Vec<String> {
        self.lines.iter().map(ChangeLine::sentence).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioSummary {
    pub estimate: ScenarioEstimate,
}

impl ScenarioSummary {
    pub fn sentences(&self) -> Vec<String> {
        let estimate = &self.estimate;
        vec![
            format!(
                "In {}, livestock+pets were {:.0}% of humanities mass footprint.",
                estimate.base_year,
                100.0 * estimate.initial_livestock_share()
            ),
            format!(
                "Estimated human mass in {}: {:.0}m tons",
                estimate.final_year, estimate.final_humans_only
            ),
            format!(
                "Imagined humans+livestock+pets mass in {}: {:.0}m tons",
                estimate.final_year, estimate.final_combined
            ),
            format!(
                "Imagined wildlife mass in {}: {:.0}m tons -- the same as it was in {}",
                estimate.final_year, estimate.final_wildlife, estimate.base_year
            ),
        ]
    }
}

/// Everything the analysis prints, in narrative order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub base_year: Year,
    pub observed: ChangeReport,
    pub projected: ChangeReport,
    pub scenario: ScenarioSummary,
}

impl AnalysisReport {
    pub fn build(
        dataset: &BiomassDataset,
        table: &DerivedTable,
        estimate: ScenarioEstimate,
        observed_year: Year,
        projected_year: Year,
    ) -> Result<Self> {
        let livestock = table.livestock_and_pets();
        Ok(Self {
            base_year: BASE_YEAR,
            observed: ChangeReport::compute(dataset, &livestock, observed_year, Outlook::Observed)?,
            projected: ChangeReport::compute(
                dataset,
                &livestock,
                projected_year,
                Outlook::Projected,
            )?,
            scenario: ScenarioSummary { estimate },
        })
    }

    pub fn sentences(&self) -> Vec<String> {
        let mut out = self.observed.sentences();
        out.extend(self.projected.sentences());
        out.extend(self.scenario.sentences());
        out
    }
}

/// Tabular view of a derived table for terminal output.
pub fn summary_table(table: &DerivedTable) -> Table {
    let mut out = Table::new();
    out.load_preset(UTF8_FULL).set_header(vec![
        "year",
        "humans only",
        "humans+livestock+pets",
        "wildlife",
        "livestock+pets",
        "total",
        "humans %",
        "livestock+pets %",
        "wildlife %",
    ]);

    for row in table.rows() {
        let mass = |value: f64| Cell::new(format!("{value:.0}")).set_alignment(CellAlignment::Right);
        let share =
            |value: f64| Cell::new(format!("{:.1}", value * 100.0)).set_alignment(CellAlignment::Right);
        out.add_row(vec![
            Cell::new(row.year),
            mass(row.humans_only),
            mass(row.combined),
            mass(row.wildlife),
            mass(row.livestock_and_pets),
            mass(row.total),
            share(row.humans_only_share),
            share(row.livestock_and_pets_share),
            share(row.wildlife_share),
        ]);
    }
    out
}
