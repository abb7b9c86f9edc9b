use biomass_core::figures::{Annotation, FigureKind, FigureSpec, LegendPosition, Marker, Rgb};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::error::{PlotError, Result};
use crate::underlay::UnderlayGrid;

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

const MARKER_DASHES: usize = 80;
const LINE_HEIGHT_FACTOR: f64 = 1.2;

fn color(rgb: Rgb) -> RGBColor {
    RGBColor(rgb.0, rgb.1, rgb.2)
}

fn nonempty_range(range: (f64, f64)) -> std::ops::Range<f64> {
    if range.1 > range.0 {
        range.0..range.1
    } else {
        range.0..range.0 + 1.0
    }
}

/// Checks that the figure has something to draw and that stacked layers share their x values.
pub fn check_layers(spec: &FigureSpec) -> Result<()> {
    let first = spec.layers.first().ok_or(PlotError::EmptyFigure(spec.id))?;
    if spec.kind == FigureKind::StackedArea {
        let expected = first.points.len();
        for layer in &spec.layers {
            if layer.points.len() != expected {
                return Err(PlotError::RaggedLayer {
                    figure: spec.id,
                    layer: layer.label.clone(),
                    expected,
                    found: layer.points.len(),
                });
            }
            let misaligned = first
                .points
                .iter()
                .zip(&layer.points)
                .enumerate()
                .find(|(_, ((x0, _), (x, _)))| x0 != x);
            if let Some((index, ((x0, _), (x, _)))) = misaligned {
                return Err(PlotError::MisalignedLayer {
                    figure: spec.id,
                    layer: layer.label.clone(),
                    index,
                    expected: *x0,
                    found: *x,
                });
            }
        }
    }
    Ok(())
}

/// Draws `spec` onto `root`. The caller owns presenting the drawing area.
pub fn draw_figure<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &FigureSpec,
    underlay: Option<&UnderlayGrid>,
) -> Result<()> {
    check_layers(spec)?;
    let fail = |err: &dyn std::fmt::Display| PlotError::Drawing {
        figure: spec.id,
        message: err.to_string(),
    };

    root.fill(&WHITE).map_err(|e| fail(&e))?;

    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, ("sans-serif", 24))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(nonempty_range(spec.x_range), nonempty_range(spec.y_range))
        .map_err(|e| fail(&e))?;

    let y_desc = if spec.y_range.1 <= 1.0 {
        "share of total mass"
    } else {
        "millions of tons"
    };
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("year")
        .y_desc(y_desc)
        .x_label_formatter(&|x: &f64| format!("{x:.0}"))
        .draw()
        .map_err(|e| fail(&e))?;

    if let Some(grid) = underlay {
        draw_underlay(&mut chart, spec, grid).map_err(|e| fail(&e))?;
    }

    match spec.kind {
        FigureKind::Lines => draw_lines(&mut chart, spec).map_err(|e| fail(&e))?,
        FigureKind::StackedArea => draw_bands(&mut chart, spec).map_err(|e| fail(&e))?,
    }

    for marker in &spec.markers {
        draw_marker(&mut chart, spec, marker).map_err(|e| fail(&e))?;
    }
    for annotation in &spec.annotations {
        draw_annotation(&mut chart, annotation).map_err(|e| fail(&e))?;
    }

    if let Some(position) = spec.legend {
        let position = match position {
            LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
            LegendPosition::UpperCenter => SeriesLabelPosition::UpperMiddle,
        };
        chart
            .configure_series_labels()
            .position(position)
            .label_font(("sans-serif", 16))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| fail(&e))?;
    }

    Ok(())
}

fn draw_underlay<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    spec: &FigureSpec,
    grid: &UnderlayGrid,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let (x0, x1) = spec.x_range;
    let (y0, y1) = spec.y_range;
    let dx = (x1 - x0) / f64::from(grid.columns);
    let dy = (y1 - y0) / f64::from(grid.rows);

    let cells = (0..grid.rows).flat_map(move |row| {
        (0..grid.columns).map(move |column| {
            let (r, g, b) = grid.cell(column, row);
            let left = x0 + f64::from(column) * dx;
            let top = y1 - f64::from(row) * dy;
            Rectangle::new(
                [(left, top), (left + dx, top - dy)],
                RGBColor(r, g, b).mix(grid.opacity).filled(),
            )
        })
    });
    chart.draw_series(cells)?;
    Ok(())
}

fn draw_lines<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    spec: &FigureSpec,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    for layer in &spec.layers {
        let stroke = color(layer.color);
        chart
            .draw_series(LineSeries::new(
                layer.points.iter().copied(),
                stroke.stroke_width(2),
            ))?
            .label(layer.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));
    }
    Ok(())
}

fn draw_bands<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    spec: &FigureSpec,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    for (layer, band) in spec.layers.iter().zip(spec.stack_bounds()) {
        let fill = color(layer.color);
        // Upper edge left to right, then the lower edge back.
        let outline: Vec<(f64, f64)> = band
            .iter()
            .map(|(x, _, upper)| (*x, *upper))
            .chain(band.iter().rev().map(|(x, lower, _)| (*x, *lower)))
            .collect();

        chart
            .draw_series(std::iter::once(Polygon::new(outline, fill.filled())))?
            .label(layer.label.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 16, y + 6)], fill.filled()));
    }
    Ok(())
}

fn draw_marker<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    spec: &FigureSpec,
    marker: &Marker,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let style = color(marker.color).stroke_width(2);
    let (y0, y1) = spec.y_range;

    if !marker.dotted {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(marker.x, y0), (marker.x, y1)],
            style,
        )))?;
        return Ok(());
    }

    let step = (y1 - y0) / MARKER_DASHES as f64;
    let dashes = (0..MARKER_DASHES).map(|i| {
        let start = y0 + step * i as f64;
        PathElement::new(vec![(marker.x, start), (marker.x, start + step * 0.4)], style)
    });
    chart.draw_series(dashes)?;
    Ok(())
}

/// Vertical pixel offset of each line of a `count`-line label whose last line sits on the anchor.
pub fn line_offsets(count: usize, line_height: i32) -> Vec<i32> {
    (0..count)
        .map(|i| -((count - 1 - i) as i32) * line_height)
        .collect()
}

fn draw_annotation<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    annotation: &Annotation,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let style = (annotation.family.as_str(), f64::from(annotation.size))
        .into_font()
        .color(&color(annotation.color))
        .pos(Pos::new(HPos::Left, VPos::Bottom));
    let line_height = (f64::from(annotation.size) * LINE_HEIGHT_FACTOR).round() as i32;
    let anchor = (annotation.x, annotation.y);

    // Labels sit on the anchor and grow upwards.
    let lines: Vec<&str> = annotation.text.lines().collect();
    let offsets = line_offsets(lines.len(), line_height);
    let elements = lines.into_iter().zip(offsets).map(|(line, dy)| {
        EmptyElement::at(anchor) + Text::new(line.to_string(), (0, dy), style.clone())
    });
    chart.draw_series(elements)?;
    Ok(())
}
