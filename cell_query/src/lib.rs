#![warn(clippy::pedantic)]
//! Cell lookups against the PostGIS `geocell_*` schema.
//!
//! Every search runs in two phases: the shape predicate and filters select
//! matching cell ids, then the ids are hydrated through the full join into
//! [`shared::geocell::Cell`] values.

pub mod database;
pub mod error;
pub mod filters;
pub mod service;
pub mod store;

pub use error::{MappingError, QueryError};
pub use filters::{CellFilters, CellQuery, ReferenceCell};
pub use service::{CellService, key_by_cgi};
pub use store::{CellStore, PgCellStore};

/// Upper bound on rows returned by any search shape.
pub const MAX_RESULT_ROWS: i64 = 1000;
