use std::fs::File;
use std::path::Path;

use polars::io::parquet::write::{ParquetCompression, ParquetWriter};
use polars::prelude::*;
use tracing::info;

use crate::derive::DerivedTable;
use crate::error::{AnalysisError, Result};

pub const FRAME_COLUMNS: [&str; 9] = [
    "year",
    "humans_only_mt",
    "combined_mt",
    "wildlife_mt",
    "livestock_and_pets_mt",
    "total_mt",
    "humans_only_share",
    "livestock_and_pets_share",
    "wildlife_share",
];

/// One row per year with every input and derived column.
pub fn derived_frame(table: &DerivedTable) -> PolarsResult<DataFrame> {
    let years: Vec<i32> = table.years();

    df!(
        FRAME_COLUMNS[0] => years,
        FRAME_COLUMNS[1] => table.column(|row| row.humans_only),
        FRAME_COLUMNS[2] => table.column(|row| row.combined),
        FRAME_COLUMNS[3] => table.column(|row| row.wildlife),
        FRAME_COLUMNS[4] => table.column(|row| row.livestock_and_pets),
        FRAME_COLUMNS[5] => table.column(|row| row.total),
        FRAME_COLUMNS[6] => table.column(|row| row.humans_only_share),
        FRAME_COLUMNS[7] => table.column(|row| row.livestock_and_pets_share),
        FRAME_COLUMNS[8] => table.column(|row| row.wildlife_share),
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    Csv,
    Parquet,
}

impl FrameFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match extension.as_deref() {
            Some("csv") => Ok(FrameFormat::Csv),
            Some("parquet") | Some("pq") => Ok(FrameFormat::Parquet),
            _ => Err(AnalysisError::Config(format!(
                "cannot infer table format from '{}'; use .csv or .parquet",
                path.display()
            ))),
        }
    }
}

/// Writes `df` to `path`, picking CSV or Parquet from the extension.
pub fn write_frame(df: &DataFrame, path: &Path) -> Result<FrameFormat> {
    let format = FrameFormat::from_path(path)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    let mut clone = df.clone();
    match format {
        FrameFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(&mut clone)?;
        }
        FrameFormat::Parquet => {
            ParquetWriter::new(&mut file)
                .with_compression(ParquetCompression::Zstd(None))
                .finish(&mut clone)?;
        }
    }

    info!(path = %path.display(), rows = df.height(), ?format, "table written");
    Ok(format)
}
