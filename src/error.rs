use thiserror::Error;

pub type Result<T> = std::result::Result<T, AnalysisError>;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("GeoJSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Schema error: no column resolves to '{field}'")]
    Schema { field: &'static str },

    #[error("Zone geometry error: {0}")]
    Geometry(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}
