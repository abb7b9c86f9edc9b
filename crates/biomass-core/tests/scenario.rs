use std::collections::BTreeSet;

use anyhow::Result;
use biomass_core::scenario::Waypoint;
use biomass_core::{
    maccready_2004, AnalysisError, BiomassDataset, MassSeries, Scenario, ScenarioParams,
    SeriesKind, Year,
};

const TOLERANCE: f64 = 1e-9;

#[test]
fn estimate_matches_ten_billion_plateau() -> Result<()> {
    let estimate = Scenario::default().estimate(maccready_2004())?;

    assert!((estimate.initial_humans_ratio - 60.0 / 95.0).abs() < TOLERANCE);
    assert!((estimate.initial_livestock_share() - 35.0 / 95.0).abs() < TOLERANCE);
    assert!((estimate.final_humans_only - 10.0 / 6.0 * 290.0).abs() < TOLERANCE);
    assert!((estimate.final_combined - (10.0 / 6.0 * 290.0) * 95.0 / 60.0).abs() < TOLERANCE);
    assert_eq!(estimate.final_wildlife, 205.0);
    assert_eq!(estimate.final_year, 2100);
    Ok(())
}

#[test]
fn extension_adds_only_future_years() -> Result<()> {
    let base = maccready_2004();
    let imagined = Scenario::default().extend(base)?;

    for (base_series, imagined_series) in [
        (&base.humans_only, &imagined.humans_only),
        (&base.combined, &imagined.combined),
        (&base.wildlife, &imagined.wildlife),
    ] {
        let base_years: BTreeSet<Year> = base_series.years().collect();
        let imagined_years: BTreeSet<Year> = imagined_series.years().collect();
        let added: Vec<Year> = imagined_years.difference(&base_years).copied().collect();

        assert!(base_years.is_subset(&imagined_years));
        assert_eq!(added, vec![2075, 2100]);
        assert_eq!(imagined_series.get(1850)?, base_series.get(1850)?);
        assert_eq!(imagined_series.get(1975)?, base_series.get(1975)?);
    }

    assert_eq!(imagined.humans_only.get(2025)?, 360.0);
    assert_eq!(imagined.combined.get(2050)?, 960.0);
    assert_eq!(imagined.wildlife.get(2075)?, 110.0);
    assert_eq!(imagined.wildlife.get(2100)?, 205.0);
    Ok(())
}

#[test]
fn extension_leaves_base_untouched() -> Result<()> {
    let base = maccready_2004().clone();
    let _ = Scenario::default().extend(&base)?;

    assert_eq!(&base, maccready_2004());
    assert_eq!(base.combined.get(2025)?, 1935.0);
    assert!(!base.wildlife.contains(2100));
    Ok(())
}

#[test]
fn parameters_are_validated() {
    let negative = ScenarioParams {
        reference_population: 0.0,
        ..ScenarioParams::default()
    };
    assert!(matches!(
        Scenario::new(negative),
        Err(AnalysisError::Config(_))
    ));

    let late_waypoint = ScenarioParams {
        final_year: 2050,
        ..ScenarioParams::default()
    };
    assert!(matches!(
        Scenario::new(late_waypoint),
        Err(AnalysisError::Config(message)) if message.contains("2050")
    ));
}

#[test]
fn waypoint_below_humans_is_rejected() {
    let params = ScenarioParams {
        waypoints: vec![Waypoint {
            year: 2025,
            humans_only: 500.0,
            combined: 400.0,
            wildlife: 20.0,
        }],
        ..ScenarioParams::default()
    };

    let result = Scenario::new(params).and_then(|s| s.extend(maccready_2004()));
    assert!(matches!(
        result,
        Err(AnalysisError::NegativeLivestock { year: 2025, .. })
    ));
}

#[test]
fn missing_reference_year_surfaces() {
    let params = ScenarioParams {
        reference_year: 1999,
        ..ScenarioParams::default()
    };
    let scenario = Scenario::new(params).expect("valid parameters");

    assert!(matches!(
        scenario.estimate(maccready_2004()),
        Err(AnalysisError::MissingYear { year: 1999, .. })
    ));
}

#[test]
fn zero_base_humans_cannot_be_extrapolated() {
    let dataset = BiomassDataset::new(
        MassSeries::new(SeriesKind::HumansOnly, [(1850, 0.0), (2000, 290.0)]),
        MassSeries::new(SeriesKind::Combined, [(1850, 95.0), (2000, 1200.0)]),
        MassSeries::new(SeriesKind::Wildlife, [(1850, 205.0), (2000, 30.0)]),
    );
    let scenario = Scenario::default();

    match scenario.estimate(&dataset) {
        Err(AnalysisError::ZeroBase { series, year }) => {
            assert_eq!(series, "humans_only");
            assert_eq!(year, 1850);
        }
        other => panic!("expected zero base, got {other:?}"),
    }
    assert!(matches!(
        scenario.extend(&dataset),
        Err(AnalysisError::ZeroBase { .. })
    ));
}
