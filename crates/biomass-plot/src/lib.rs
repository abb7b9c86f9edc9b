//! SVG rendering of [`FigureSpec`]s.

pub mod canvas;
pub mod error;
pub mod underlay;

use std::path::{Path, PathBuf};

use biomass_core::figures::FigureSpec;
use plotters::prelude::*;
use tracing::{debug, info};

pub use error::{PlotError, Result};
pub use underlay::UnderlayGrid;

/// Renders `spec` into an SVG document, loading its underlay if it has one.
pub fn render_svg(spec: &FigureSpec) -> Result<String> {
    let grid = match &spec.underlay {
        Some(underlay) => UnderlayGrid::load(underlay)?,
        None => None,
    };
    render_svg_with(spec, grid.as_ref())
}

/// Renders `spec` with an already decoded underlay.
pub fn render_svg_with(spec: &FigureSpec, underlay: Option<&UnderlayGrid>) -> Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, spec.size).into_drawing_area();
        canvas::draw_figure(&root, spec, underlay)?;
        root.present().map_err(|e| PlotError::Drawing {
            figure: spec.id,
            message: e.to_string(),
        })?;
    }
    debug!(figure = spec.id, bytes = svg.len(), "figure rendered");
    Ok(svg)
}

/// Writes `<dir>/<id>.svg` and returns its path.
pub fn write_svg(spec: &FigureSpec, dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let svg = render_svg(spec)?;
    let path = dir.join(format!("{}.svg", spec.id));
    std::fs::write(&path, svg)?;
    info!(figure = spec.id, path = %path.display(), "figure written");
    Ok(path)
}

/// Writes every figure in order, stopping at the first failure.
pub fn write_all(specs: &[FigureSpec], dir: &Path) -> Result<Vec<PathBuf>> {
    specs.iter().map(|spec| write_svg(spec, dir)).collect()
}
