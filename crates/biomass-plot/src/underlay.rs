use biomass_core::figures::Underlay;
use image::imageops::FilterType;
use image::DynamicImage;
use tracing::{debug, warn};

use crate::error::{PlotError, Result};

/// A raster image resampled to a coarse grid of opaque cells, row-major from the top left.
///
/// Transparent pixels are composited over white so every cell can be drawn as a plain
/// rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct UnderlayGrid {
    pub columns: u32,
    pub rows: u32,
    pub opacity: f64,
    pub cells: Vec<(u8, u8, u8)>,
}

impl UnderlayGrid {
    pub fn from_image(image: &DynamicImage, resolution: (u32, u32), opacity: f64) -> Self {
        let (columns, rows) = (resolution.0.max(1), resolution.1.max(1));
        let resized = image.resize_exact(columns, rows, FilterType::Triangle).to_rgba8();

        let cells = resized
            .pixels()
            .map(|pixel| {
                let [r, g, b, a] = pixel.0;
                let alpha = f64::from(a) / 255.0;
                let over_white = |channel: u8| {
                    (f64::from(channel) * alpha + 255.0 * (1.0 - alpha)).round() as u8
                };
                (over_white(r), over_white(g), over_white(b))
            })
            .collect();

        Self {
            columns,
            rows,
            opacity,
            cells,
        }
    }

    /// Loads the configured underlay. A missing file is not an error: the figure is drawn
    /// without it.
    pub fn load(underlay: &Underlay) -> Result<Option<Self>> {
        if !underlay.path.exists() {
            warn!(path = %underlay.path.display(), "underlay not found, drawing without it");
            return Ok(None);
        }

        let image = image::open(&underlay.path).map_err(|source| PlotError::Underlay {
            path: underlay.path.clone(),
            source,
        })?;
        debug!(
            path = %underlay.path.display(),
            width = image.width(),
            height = image.height(),
            "underlay decoded"
        );
        Ok(Some(Self::from_image(
            &image,
            underlay.resolution,
            underlay.opacity,
        )))
    }

    pub fn cell(&self, column: u32, row: u32) -> (u8, u8, u8) {
        self.cells[(row * self.columns + column) as usize]
    }
}
