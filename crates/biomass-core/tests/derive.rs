use anyhow::Result;
use biomass_core::{
    find_change, livestock_and_pets, maccready_2004, AnalysisError, BiomassDataset, DerivedTable,
    MassSeries, Scenario, SeriesKind,
};

const TOLERANCE: f64 = 1e-9;

#[test]
fn humans_grew_to_290_over_60() -> Result<()> {
    let ratio = find_change(&maccready_2004().humans_only, 2000)?;
    assert!((ratio - 290.0 / 60.0).abs() < TOLERANCE);
    Ok(())
}

#[test]
fn wildlife_shrank_to_30_over_205() -> Result<()> {
    let ratio = find_change(&maccready_2004().wildlife, 2000)?;
    assert!((ratio - 30.0 / 205.0).abs() < TOLERANCE);
    assert!((ratio - 0.1463).abs() < 1e-4);
    Ok(())
}

#[test]
fn livestock_is_combined_minus_humans() -> Result<()> {
    let livestock = livestock_and_pets(maccready_2004())?;

    assert_eq!(livestock.kind(), SeriesKind::LivestockAndPets);
    assert_eq!(livestock.get(1850)?, 35.0);
    assert_eq!(livestock.get(2000)?, 910.0);
    assert!((find_change(&livestock, 2000)? - 26.0).abs() < TOLERANCE);
    assert!(livestock.points().all(|(_, mass)| mass >= 0.0));
    Ok(())
}

#[test]
fn livestock_reports_missing_year() {
    let dataset = BiomassDataset::new(
        MassSeries::new(SeriesKind::HumansOnly, [(1850, 60.0)]),
        MassSeries::new(SeriesKind::Combined, [(1850, 95.0), (1875, 110.0)]),
        MassSeries::new(SeriesKind::Wildlife, [(1850, 205.0), (1875, 190.0)]),
    );

    match livestock_and_pets(&dataset) {
        Err(AnalysisError::MissingYear { series, year }) => {
            assert_eq!(series, "humans_only");
            assert_eq!(year, 1875);
        }
        other => panic!("expected missing year, got {other:?}"),
    }
}

#[test]
fn find_change_needs_both_years() {
    let series = MassSeries::new(SeriesKind::Wildlife, [(1875, 190.0), (2000, 30.0)]);
    assert!(matches!(
        find_change(&series, 2000),
        Err(AnalysisError::MissingYear { year: 1850, .. })
    ));

    let zero = MassSeries::new(SeriesKind::Wildlife, [(1850, 0.0), (2000, 30.0)]);
    assert!(matches!(
        find_change(&zero, 2000),
        Err(AnalysisError::ZeroBase { .. })
    ));
}

#[test]
fn three_shares_sum_to_one() -> Result<()> {
    let base = DerivedTable::from_dataset(maccready_2004())?;
    let imagined = DerivedTable::from_dataset(&Scenario::default().extend(maccready_2004())?)?;

    for table in [&base, &imagined] {
        for row in table.rows() {
            let sum = row.humans_only_share + row.livestock_and_pets_share + row.wildlife_share;
            assert!((sum - 1.0).abs() < TOLERANCE, "shares sum to {sum} in {}", row.year);
            assert!((row.total - (row.combined + row.wildlife)).abs() < TOLERANCE);
        }
    }
    Ok(())
}

#[test]
fn two_band_shares_complement_each_other() -> Result<()> {
    let table = DerivedTable::from_dataset(maccready_2004())?;
    let [combined, rest] = table.two_band_shares();

    assert_eq!(combined.len(), table.rows().len());
    for ((combined, rest), row) in combined.iter().zip(&rest).zip(table.rows()) {
        assert!((combined + rest - 1.0).abs() < TOLERANCE);
        assert!((rest - row.wildlife_share).abs() < TOLERANCE);
    }
    // 1850: 95 / (95 + 205)
    assert!((combined[0] - 95.0 / 300.0).abs() < TOLERANCE);
    Ok(())
}

#[test]
fn derived_livestock_matches_direct_extraction() -> Result<()> {
    let table = DerivedTable::from_dataset(maccready_2004())?;
    assert_eq!(table.livestock_and_pets(), livestock_and_pets(maccready_2004())?);
    Ok(())
}

#[test]
fn shares_need_a_nonzero_total() {
    let dataset = BiomassDataset::new(
        MassSeries::new(SeriesKind::HumansOnly, [(1850, 60.0), (1875, 0.0)]),
        MassSeries::new(SeriesKind::Combined, [(1850, 95.0), (1875, 0.0)]),
        MassSeries::new(SeriesKind::Wildlife, [(1850, 205.0), (1875, 0.0)]),
    );

    assert!(matches!(
        DerivedTable::from_dataset(&dataset),
        Err(AnalysisError::ZeroTotal { year: 1875 })
    ));
}
