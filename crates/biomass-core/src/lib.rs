pub mod config;
pub mod dataset;
pub mod derive;
pub mod error;
pub mod figures;
pub mod frame;
pub mod pipeline;
pub mod report;
pub mod scenario;
pub mod series;

pub use dataset::{maccready_2004, BiomassDataset};
pub use derive::{find_change, livestock_and_pets, DerivedRow, DerivedTable, BASE_YEAR};
pub use error::{AnalysisError, Result};
pub use pipeline::Analysis;
pub use scenario::{Scenario, ScenarioEstimate, ScenarioParams};
pub use series::{MassSeries, SeriesKind, Year};
