// crates/biomass-core/src/error.rs

use thiserror::Error;

use crate::series::Year;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("series '{series}' has no value for year {year}")]
    MissingYear { series: String, year: Year },

    #[error(
        "combined mass {combined} is below humans-only mass {humans_only} in {year}; livestock+pets would be negative"
    )]
    NegativeLivestock {
        year: Year,
        combined: f64,
        humans_only: f64,
    },

    #[error("series '{series}' is zero at base year {year}; relative change is undefined")]
    ZeroBase { series: String, year: Year },

    #[error("total mass is zero in {year}; shares are undefined")]
    ZeroTotal { year: Year },

    #[error("series '{left}' and '{right}' disagree on year {year}")]
    KeyMismatch {
        left: String,
        right: String,
        year: Year,
    },

    #[error("series '{0}' has no data points")]
    EmptySeries(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
