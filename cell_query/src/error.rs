use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Sql(#[from] sqlx::Error),
    #[error("illegal args for query: {0}")]
    IllegalArgs(String),
    #[error("data integrity error: {0}")]
    Mapping(#[from] MappingError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MappingError {
    #[error("cell {cell_id:?} is missing required column {column}")]
    MissingColumn {
        column: &'static str,
        cell_id: Option<i64>,
    },
}
