//! Backend independent descriptions of every chart in the analysis.
//!
//! A [`FigureSpec`] says what to draw: layers, reference markers, text annotations and an
//! optional raster underlay. Turning it into pixels is the job of `biomass-plot`.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

use crate::derive::DerivedTable;
use crate::series::{SeriesKind, Year};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLUE: Rgb = Rgb(0x1f, 0x77, 0xb4);
    pub const ORANGE: Rgb = Rgb(0xff, 0x7f, 0x0e);
    pub const GREEN: Rgb = Rgb(0x2c, 0xa0, 0x2c);
    pub const RED: Rgb = Rgb(0xd6, 0x27, 0x28);
    pub const DARK_GRAY: Rgb = Rgb(0xa9, 0xa9, 0xa9);
    pub const WHITE: Rgb = Rgb(0xff, 0xff, 0xff);
    pub const DEEP_TEAL: Rgb = Rgb(0x24, 0x50, 0x64);
    pub const TEAL: Rgb = Rgb(0x18, 0x77, 0x97);
    pub const SKY: Rgb = Rgb(0x7c, 0xd3, 0xf5);
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FigureKind {
    Lines,
    StackedArea,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LegendPosition {
    UpperLeft,
    UpperCenter,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    pub label: String,
    pub color: Rgb,
    pub points: Vec<(f64, f64)>,
}

impl Layer {
    pub fn new(label: impl Into<String>, color: Rgb, years: &[Year], values: &[f64]) -> Self {
        Self {
            label: label.into(),
            color,
            points: years
                .iter()
                .zip(values)
                .map(|(year, value)| (f64::from(*year), *value))
                .collect(),
        }
    }
}

/// Vertical reference line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub x: f64,
    pub color: Rgb,
    pub dotted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub color: Rgb,
    pub size: u32,
    pub family: String,
}

impl Annotation {
    fn band_label(x: f64, y: f64, text: &str) -> Self {
        Self {
            x,
            y,
            text: text.to_string(),
            color: Rgb::WHITE,
            size: 18,
            family: "Verdana".to_string(),
        }
    }
}

/// Raster image stretched over the whole plotting range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Underlay {
    pub path: PathBuf,
    pub opacity: f64,
    /// Number of cells (columns, rows) the image is resampled to.
    pub resolution: (u32, u32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureSpec {
    pub id: &'static str,
    pub title: String,
    pub kind: FigureKind,
    pub size: (u32, u32),
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub layers: Vec<Layer>,
    pub markers: Vec<Marker>,
    pub annotations: Vec<Annotation>,
    pub legend: Option<LegendPosition>,
    pub underlay: Option<Underlay>,
}

impl FigureSpec {
    /// Lower and upper edge of every band of a stacked figure, bottom band first.
    ///
    /// Layers are stacked point by point on a zero baseline, so every layer must have the
    /// same x positions as the first one.
    pub fn stack_bounds(&self) -> Vec<Vec<(f64, f64, f64)>> {
        let Some(first) = self.layers.first() else {
            return Vec::new();
        };
        let mut baseline = vec![0.0; first.points.len()];
        let mut bands = Vec::with_capacity(self.layers.len());

        for layer in &self.layers {
            let band = layer
                .points
                .iter()
                .zip(baseline.iter_mut())
                .map(|((x, y), base)| {
                    let lower = *base;
                    *base += y;
                    (*x, lower, *base)
                })
                .collect();
            bands.push(band);
        }
        bands
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FigureOptions {
    pub chart_size: (u32, u32),
    pub calibration_size: (u32, u32),
    pub underlay: Option<Underlay>,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            chart_size: (1200, 600),
            calibration_size: (1500, 1000),
            underlay: None,
        }
    }
}

/// Year of the dotted reference line on every chart.
pub const REFERENCE_YEAR: f64 = 2000.0;

// Extent of the scanned source chart the underlay covers.
const CALIBRATION_X: (f64, f64) = (1850.0, 2050.0);
const CALIBRATION_Y: (f64, f64) = (0.0, 2500.0);

fn year_range(years: &[Year]) -> (f64, f64) {
    match (years.first(), years.last()) {
        (Some(first), Some(last)) => (f64::from(*first), f64::from(*last)),
        _ => (0.0, 1.0),
    }
}

/// The eyeballed lines drawn over the scanned source chart.
pub fn calibration(table: &DerivedTable, options: &FigureOptions) -> FigureSpec {
    let years = table.years();
    let layers = vec![
        Layer::new(
            SeriesKind::Combined.label(),
            Rgb::BLUE,
            &years,
            &table.column(|row| row.combined),
        ),
        Layer::new(
            SeriesKind::Wildlife.label(),
            Rgb::ORANGE,
            &years,
            &table.column(|row| row.wildlife),
        ),
        Layer::new(
            SeriesKind::HumansOnly.label(),
            Rgb::GREEN,
            &years,
            &table.column(|row| row.humans_only),
        ),
        Layer::new(
            SeriesKind::LivestockAndPets.label(),
            Rgb::RED,
            &years,
            &table.column(|row| row.livestock_and_pets),
        ),
    ];

    FigureSpec {
        id: "calibration",
        title: "Digitized series over the source chart".to_string(),
        kind: FigureKind::Lines,
        size: options.calibration_size,
        x_range: CALIBRATION_X,
        y_range: CALIBRATION_Y,
        layers,
        markers: vec![Marker {
            x: REFERENCE_YEAR,
            color: Rgb::BLUE,
            dotted: true,
        }],
        annotations: vec![Annotation {
            x: 1980.0,
            y: 450.0,
            text: "Livestock+Pets Only".to_string(),
            color: Rgb(0, 0, 0),
            size: 13,
            family: "sans-serif".to_string(),
        }],
        legend: None,
        underlay: options.underlay.clone(),
    }
}

fn stacked_mass_with(
    id: &'static str,
    title: &str,
    table: &DerivedTable,
    legend: LegendPosition,
    options: &FigureOptions,
) -> FigureSpec {
    let years = table.years();
    let top = table
        .column(|row| row.total)
        .into_iter()
        .fold(0.0_f64, f64::max);

    FigureSpec {
        id,
        title: title.to_string(),
        kind: FigureKind::StackedArea,
        size: options.chart_size,
        x_range: year_range(&years),
        y_range: (0.0, top),
        layers: vec![
            Layer::new(
                SeriesKind::HumansOnly.label(),
                Rgb::BLUE,
                &years,
                &table.column(|row| row.humans_only),
            ),
            Layer::new(
                SeriesKind::LivestockAndPets.label(),
                Rgb::ORANGE,
                &years,
                &table.column(|row| row.livestock_and_pets),
            ),
            Layer::new(
                SeriesKind::Wildlife.label(),
                Rgb::GREEN,
                &years,
                &table.column(|row| row.wildlife),
            ),
        ],
        markers: vec![Marker {
            x: REFERENCE_YEAR,
            color: Rgb::DARK_GRAY,
            dotted: true,
        }],
        annotations: Vec::new(),
        legend: Some(legend),
        underlay: None,
    }
}

/// Absolute stacked mass of humans, livestock+pets and wildlife.
pub fn stacked_mass(table: &DerivedTable, options: &FigureOptions) -> FigureSpec {
    stacked_mass_with(
        "stacked_mass",
        "Land vertebrate mass (millions of tons)",
        table,
        LegendPosition::UpperCenter,
        options,
    )
}

pub fn imagined_stacked_mass(table: &DerivedTable, options: &FigureOptions) -> FigureSpec {
    stacked_mass_with(
        "imagined_stacked_mass",
        "Imagined land vertebrate mass (millions of tons)",
        table,
        LegendPosition::UpperLeft,
        options,
    )
}

fn share_two_band_with(
    id: &'static str,
    title: &str,
    table: &DerivedTable,
    human_label_at: (f64, f64),
    options: &FigureOptions,
) -> FigureSpec {
    let years = table.years();
    let [combined, wildlife] = table.two_band_shares();

    FigureSpec {
        id,
        title: title.to_string(),
        kind: FigureKind::StackedArea,
        size: options.chart_size,
        x_range: year_range(&years),
        y_range: (0.0, 1.0),
        layers: vec![
            Layer::new("humans, livestock, & pets", Rgb::TEAL, &years, &combined),
            Layer::new("natural land-dwelling vertebrates", Rgb::SKY, &years, &wildlife),
        ],
        markers: vec![Marker {
            x: REFERENCE_YEAR,
            color: Rgb::DARK_GRAY,
            dotted: true,
        }],
        annotations: vec![
            Annotation::band_label(1860.0, 0.8, "natural land-dwelling\nvertebrates"),
            Annotation::band_label(
                human_label_at.0,
                human_label_at.1,
                "humans,\n livestock,\n & pets",
            ),
        ],
        legend: None,
        underlay: None,
    }
}

/// Share of total mass held by humans+livestock+pets versus wildlife.
pub fn share_two_band(table: &DerivedTable, options: &FigureOptions) -> FigureSpec {
    share_two_band_with(
        "share_two_band",
        "Share of land vertebrate mass",
        table,
        (1965.0, 0.15),
        options,
    )
}

pub fn imagined_share_two_band(table: &DerivedTable, options: &FigureOptions) -> FigureSpec {
    share_two_band_with(
        "imagined_share_two_band",
        "Imagined share of land vertebrate mass",
        table,
        (2050.0, 0.15),
        options,
    )
}

/// Share of total mass split into humans, livestock+pets and wildlife.
pub fn share_three_band(table: &DerivedTable, options: &FigureOptions) -> FigureSpec {
    let years = table.years();
    let [humans, livestock, wildlife] = table.three_band_shares();

    FigureSpec {
        id: "share_three_band",
        title: "Share of land vertebrate mass by group".to_string(),
        kind: FigureKind::StackedArea,
        size: options.chart_size,
        x_range: year_range(&years),
        y_range: (0.0, 1.0),
        layers: vec![
            Layer::new("humans only", Rgb::DEEP_TEAL, &years, &humans),
            Layer::new("livestock & pets", Rgb::TEAL, &years, &livestock),
            Layer::new("natural land-dwelling vertebrates", Rgb::SKY, &years, &wildlife),
        ],
        markers: vec![Marker {
            x: REFERENCE_YEAR,
            color: Rgb::DARK_GRAY,
            dotted: true,
        }],
        annotations: vec![
            Annotation::band_label(1860.0, 0.8, "natural land-dwelling\nvertebrates"),
            Annotation::band_label(1945.0, 0.5, "livestock & pets"),
            Annotation::band_label(1960.0, 0.12, "humans only"),
        ],
        legend: None,
        underlay: None,
    }
}

/// Every figure of the analysis in narrative order.
pub fn catalogue(
    base: &DerivedTable,
    imagined: &DerivedTable,
    options: &FigureOptions,
) -> Vec<FigureSpec> {
    vec![
        calibration(base, options),
        stacked_mass(base, options),
        share_two_band(base, options),
        share_three_band(base, options),
        imagined_stacked_mass(imagined, options),
        imagined_share_two_band(imagined, options),
    ]
}
