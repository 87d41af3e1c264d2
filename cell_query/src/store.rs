use crate::database::models::CellHit;
use crate::database::queries;
use crate::error::QueryError;
use crate::filters::{CellFilters, CellQuery};
use async_trait::async_trait;
use shared::geocell::{Cell, CellPolygon, PolygonKind};
use sqlx::{Pool, Postgres};
use tracing::{debug, instrument, warn};

/// Two-phase access to cells: select matching ids, then hydrate them.
#[async_trait]
pub trait CellStore: Send + Sync {
    async fn find_ids(
        &self,
        query: &CellQuery,
        filters: &CellFilters,
    ) -> Result<Vec<CellHit>, QueryError>;

    async fn hydrate(&self, ids: &[i64]) -> Result<Vec<Cell>, QueryError>;

    /// Exact match on CGI, falling back to the paragon CGI.
    async fn hydrate_keys(&self, keys: &[String]) -> Result<Vec<Cell>, QueryError>;

    async fn polygons(
        &self,
        cell_ids: &[i64],
        kind: PolygonKind,
    ) -> Result<Vec<CellPolygon>, QueryError>;
}

#[derive(Clone)]
pub struct PgCellStore {
    pool: Pool<Postgres>,
}

impl PgCellStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn list_districts(&self) -> Result<Vec<String>, QueryError> {
        queries::list_districts(&self.pool)
            .await
            .inspect_err(|e| warn!(error = ?e, "failed to list districts"))
    }

    pub async fn list_counties(&self, district: Option<&str>) -> Result<Vec<String>, QueryError> {
        queries::list_counties(&self.pool, district)
            .await
            .inspect_err(|e| warn!(error = ?e, district, "failed to list counties"))
    }

    pub async fn list_operator_brands(&self) -> Result<Vec<String>, QueryError> {
        queries::list_operator_brands(&self.pool)
            .await
            .inspect_err(|e| warn!(error = ?e, "failed to list operator brands"))
    }

    pub async fn list_bands(&self) -> Result<Vec<String>, QueryError> {
        queries::list_bands(&self.pool)
            .await
            .inspect_err(|e| warn!(error = ?e, "failed to list bands"))
    }
}

#[async_trait]
impl CellStore for PgCellStore {
    #[instrument(skip(self), fields(shape = query.shape()))]
    async fn find_ids(
        &self,
        query: &CellQuery,
        filters: &CellFilters,
    ) -> Result<Vec<CellHit>, QueryError> {
        let hits = queries::find_cell_ids(&self.pool, query, filters)
            .await
            .inspect_err(|e| warn!(error = ?e, shape = query.shape(), "cell id query failed"))?;
        debug!(count = hits.len(), "cell ids selected");
        Ok(hits)
    }

    #[instrument(skip_all, fields(count = ids.len()))]
    async fn hydrate(&self, ids: &[i64]) -> Result<Vec<Cell>, QueryError> {
        queries::fetch_cells_by_ids(&self.pool, ids)
            .await
            .inspect_err(|e| warn!(error = ?e, "cell hydration failed"))
    }

    #[instrument(skip_all, fields(count = keys.len()))]
    async fn hydrate_keys(&self, keys: &[String]) -> Result<Vec<Cell>, QueryError> {
        queries::fetch_cells_by_keys(&self.pool, keys)
            .await
            .inspect_err(|e| warn!(error = ?e, "cell lookup by CGI failed"))
    }

    #[instrument(skip_all, fields(count = cell_ids.len(), kind = ?kind))]
    async fn polygons(
        &self,
        cell_ids: &[i64],
        kind: PolygonKind,
    ) -> Result<Vec<CellPolygon>, QueryError> {
        queries::fetch_cell_polygons(&self.pool, cell_ids, kind)
            .await
            .inspect_err(|e| warn!(error = ?e, "cell polygon query failed"))
    }
}
