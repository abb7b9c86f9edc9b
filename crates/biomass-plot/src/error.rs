use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("{figure} drawing failed: {message}")]
    Drawing {
        figure: &'static str,
        message: String,
    },

    #[error("failed to read underlay {path}: {source}")]
    Underlay {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{0} has no layers to draw")]
    EmptyFigure(&'static str),

    #[error("{figure} layer '{layer}' has {found} points, expected {expected}")]
    RaggedLayer {
        figure: &'static str,
        layer: String,
        expected: usize,
        found: usize,
    },

    #[error("{figure} layer '{layer}' point {index} is at x={found}, expected x={expected}")]
    MisalignedLayer {
        figure: &'static str,
        layer: String,
        index: usize,
        expected: f64,
        found: f64,
    },

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PlotError>;
