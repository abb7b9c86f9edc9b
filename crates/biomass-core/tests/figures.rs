use anyhow::Result;
use biomass_core::figures::{
    catalogue, share_three_band, stacked_mass, FigureKind, FigureOptions, LegendPosition, Rgb,
};
use biomass_core::{maccready_2004, DerivedTable, Scenario};

fn tables() -> Result<(DerivedTable, DerivedTable)> {
    let base = DerivedTable::from_dataset(maccready_2004())?;
    let imagined = DerivedTable::from_dataset(&Scenario::default().extend(maccready_2004())?)?;
    Ok((base, imagined))
}

#[test]
fn catalogue_lists_every_chart_in_order() -> Result<()> {
    let (base, imagined) = tables()?;
    let figures = catalogue(&base, &imagined, &FigureOptions::default());
    let ids: Vec<&str> = figures.iter().map(|f| f.id).collect();

    assert_eq!(
        ids,
        vec![
            "calibration",
            "stacked_mass",
            "share_two_band",
            "share_three_band",
            "imagined_stacked_mass",
            "imagined_share_two_band",
        ]
    );
    for figure in &figures {
        assert_eq!(figure.markers.len(), 1);
        assert_eq!(figure.markers[0].x, 2000.0);
        assert!(figure.markers[0].dotted);
    }
    Ok(())
}

#[test]
fn calibration_uses_source_chart_extent() -> Result<()> {
    let (base, imagined) = tables()?;
    let calibration = &catalogue(&base, &imagined, &FigureOptions::default())[0];

    assert_eq!(calibration.kind, FigureKind::Lines);
    assert_eq!(calibration.x_range, (1850.0, 2050.0));
    assert_eq!(calibration.y_range, (0.0, 2500.0));
    assert_eq!(calibration.layers.len(), 4);
    assert_eq!(calibration.annotations[0].text, "Livestock+Pets Only");
    Ok(())
}

#[test]
fn stacked_mass_tops_out_at_total() -> Result<()> {
    let (base, _) = tables()?;
    let figure = stacked_mass(&base, &FigureOptions::default());
    let bands = figure.stack_bounds();

    assert_eq!(figure.legend, Some(LegendPosition::UpperCenter));
    assert_eq!(bands.len(), 3);
    for ((x, _, upper), row) in bands[2].iter().zip(base.rows()) {
        assert_eq!(*x, f64::from(row.year));
        assert!((upper - row.total).abs() < 1e-9);
    }
    // 2050 total
    assert_eq!(figure.y_range, (0.0, 2710.0));
    Ok(())
}

#[test]
fn share_bands_fill_the_unit_interval() -> Result<()> {
    let (base, _) = tables()?;
    let figure = share_three_band(&base, &FigureOptions::default());
    let bands = figure.stack_bounds();

    assert_eq!(
        figure.layers.iter().map(|l| l.color).collect::<Vec<_>>(),
        vec![Rgb::DEEP_TEAL, Rgb::TEAL, Rgb::SKY]
    );
    for (_, lower, _) in &bands[0] {
        assert_eq!(*lower, 0.0);
    }
    for (_, _, upper) in &bands[2] {
        assert!((upper - 1.0).abs() < 1e-9);
    }
    Ok(())
}

#[test]
fn imagined_share_moves_human_label() -> Result<()> {
    let (base, imagined) = tables()?;
    let figures = catalogue(&base, &imagined, &FigureOptions::default());
    let imagined_share = figures.last().expect("figures");

    assert_eq!(imagined_share.x_range, (1850.0, 2100.0));
    assert_eq!(imagined_share.annotations[1].x, 2050.0);
    assert_eq!(imagined_share.annotations[1].y, 0.15);
    Ok(())
}

#[test]
fn colours_display_as_hex() {
    assert_eq!(Rgb::TEAL.to_string(), "#187797");
    assert_eq!(Rgb::SKY.to_string(), "#7cd3f5");
}
