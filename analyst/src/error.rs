use cell_query::QueryError;
use kmz_export::ExportError;
use shared::error::{ConfigError, InitializationError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Initialization(#[from] InitializationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Input rejected before any query runs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: &'static str, value: String },
    #[error("unknown technology {0:?}, expected 2G, 3G, 4G, 5G or a numeric code")]
    UnknownTechnology(String),
    #[error("{field} must be a date like 2025-04-26, got {value:?}")]
    BadDate { field: &'static str, value: String },
}
