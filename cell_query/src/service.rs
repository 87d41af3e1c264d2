use crate::error::QueryError;
use crate::filters::{CellFilters, CellQuery, ReferenceCell};
use crate::store::CellStore;
use geo::Point;
use shared::geocell::{Cell, CellPolygon, PolygonKind};
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info, instrument, warn};

/// Query operations exposed to the controller, one per search shape.
///
/// Argument checks that make a search meaningless fail with
/// [`QueryError::IllegalArgs`] before any SQL runs.
pub struct CellService<S> {
    store: S,
}

impl<S: CellStore> CellService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Exact-match batch fetch keyed by CGI. Cells without any CGI are dropped.
    #[instrument(skip_all, fields(requested = cgis.len()))]
    pub async fn cells_by_cgi_list(
        &self,
        cgis: &[String],
    ) -> Result<BTreeMap<String, Cell>, QueryError> {
        let keys: Vec<String> = cgis
            .iter()
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();
        if keys.is_empty() {
            return Ok(BTreeMap::new());
        }

        let cells = self.store.hydrate_keys(&keys).await?;
        let by_key = key_by_cgi(cells);
        debug!(found = by_key.len(), "cells resolved by CGI");
        Ok(by_key)
    }

    #[instrument(skip(self, filters))]
    pub async fn neighbor_cells(
        &self,
        cgi: &str,
        radius_km: f64,
        same_network: bool,
        filters: &CellFilters,
    ) -> Result<Vec<Cell>, QueryError> {
        validate_radius(radius_km)?;
        let reference = self.resolve_reference(cgi, same_network).await?;
        self.search(
            CellQuery::Neighbors {
                reference,
                radius_km,
            },
            filters,
        )
        .await
    }

    pub async fn cells_in_circle(
        &self,
        lat: f64,
        lon: f64,
        radius_km: f64,
        filters: &CellFilters,
    ) -> Result<Vec<Cell>, QueryError> {
        validate_radius(radius_km)?;
        validate_coordinates(lat, lon)?;
        self.search(
            CellQuery::Circle {
                center: Point::new(lon, lat),
                radius_km,
            },
            filters,
        )
        .await
    }

    pub async fn cells_in_rectangle(
        &self,
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
        filters: &CellFilters,
    ) -> Result<Vec<Cell>, QueryError> {
        validate_coordinates(lat1, lon1)?;
        validate_coordinates(lat2, lon2)?;
        self.search(CellQuery::rectangle(lat1, lon1, lat2, lon2), filters)
            .await
    }

    /// Cells whose location lies in `county`, optionally also requiring the county's district.
    pub async fn cells_in_administrative_region(
        &self,
        district: Option<&str>,
        county: &str,
        filters: &CellFilters,
    ) -> Result<Vec<Cell>, QueryError> {
        let county = county.trim();
        if county.is_empty() {
            return Err(QueryError::IllegalArgs("county must not be empty".into()));
        }
        let district = district
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(String::from);
        self.search(
            CellQuery::AdministrativeRegion {
                district,
                county: county.to_string(),
            },
            filters,
        )
        .await
    }

    pub async fn cells_by_lac_tac(
        &self,
        lac_tac: i64,
        filters: &CellFilters,
    ) -> Result<Vec<Cell>, QueryError> {
        if lac_tac <= 0 {
            return Err(QueryError::IllegalArgs(format!(
                "LAC/TAC must be positive. lac_tac = {lac_tac}"
            )));
        }
        self.search(CellQuery::LacTac(lac_tac), filters).await
    }

    pub async fn cells_by_enb_gnb(
        &self,
        enb_gnb: i64,
        filters: &CellFilters,
    ) -> Result<Vec<Cell>, QueryError> {
        if enb_gnb <= 0 {
            return Err(QueryError::IllegalArgs(format!(
                "eNB/gNB id must be positive. enb_gnb = {enb_gnb}"
            )));
        }
        self.search(CellQuery::EnbGnb(enb_gnb), filters).await
    }

    pub async fn cells_by_band(
        &self,
        band: &str,
        filters: &CellFilters,
    ) -> Result<Vec<Cell>, QueryError> {
        let band = band.trim();
        if band.is_empty() {
            return Err(QueryError::IllegalArgs("band must not be empty".into()));
        }
        self.search(CellQuery::Band(band.to_string()), filters)
            .await
    }

    /// Polygons of `cells`, grouped by cell id.
    pub async fn polygons_for(
        &self,
        cells: &[Cell],
        kind: PolygonKind,
    ) -> Result<HashMap<i64, Vec<CellPolygon>>, QueryError> {
        let ids: Vec<i64> = cells.iter().map(|c| c.id).collect();
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let mut by_cell: HashMap<i64, Vec<CellPolygon>> = HashMap::new();
        for polygon in self.store.polygons(&ids, kind).await? {
            by_cell.entry(polygon.cell_id).or_default().push(polygon);
        }
        Ok(by_cell)
    }

    async fn resolve_reference(
        &self,
        cgi: &str,
        same_network: bool,
    ) -> Result<ReferenceCell, QueryError> {
        let cgi = cgi.trim();
        if cgi.is_empty() {
            return Err(QueryError::IllegalArgs("reference CGI must not be empty".into()));
        }

        let candidates = self.store.hydrate_keys(&[cgi.to_string()]).await?;
        // A direct CGI match wins over a paragon CGI match
        let reference = candidates
            .iter()
            .find(|c| c.cgi.as_deref() == Some(cgi))
            .or_else(|| candidates.first())
            .ok_or_else(|| {
                QueryError::IllegalArgs(format!("reference cell not found. cgi = {cgi}"))
            })?;

        let point = reference.point().ok_or_else(|| {
            QueryError::IllegalArgs(format!("reference cell has no coordinates. cgi = {cgi}"))
        })?;

        let same_network_brand = if same_network {
            let brand = reference.brand().ok_or_else(|| {
                QueryError::IllegalArgs(format!(
                    "reference cell has no operator brand to match. cgi = {cgi}"
                ))
            })?;
            Some(brand.to_string())
        } else {
            None
        };

        Ok(ReferenceCell {
            id: reference.id,
            point,
            same_network_brand,
        })
    }

    async fn search(&self, query: CellQuery, filters: &CellFilters) -> Result<Vec<Cell>, QueryError> {
        filters.validate()?;

        let hits = self.store.find_ids(&query, filters).await?;
        if hits.is_empty() {
            info!(shape = query.shape(), "no cells matched");
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = hits.iter().map(|h| h.id).collect();
        let mut by_id: HashMap<i64, Cell> = self
            .store
            .hydrate(&ids)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect();

        // Keep the phase-one ordering, which is by distance for radial shapes
        let cells: Vec<Cell> = hits
            .into_iter()
            .filter_map(|hit| {
                let mut cell = by_id.remove(&hit.id)?;
                cell.distance_from_reference = hit.distance;
                Some(cell)
            })
            .collect();

        info!(shape = query.shape(), count = cells.len(), "cells matched");
        Ok(cells)
    }
}

/// Keys cells by CGI, or by paragon CGI when the CGI is missing. Cells with neither are dropped.
pub fn key_by_cgi(cells: impl IntoIterator<Item = Cell>) -> BTreeMap<String, Cell> {
    let mut by_key = BTreeMap::new();
    for cell in cells {
        let Some(key) = cell.key().map(String::from) else {
            warn!(cell_id = cell.id, "dropping cell without a CGI or paragon CGI");
            continue;
        };
        by_key.entry(key).or_insert(cell);
    }
    by_key
}

fn validate_radius(radius_km: f64) -> Result<(), QueryError> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(())
    } else {
        Err(QueryError::IllegalArgs(format!(
            "radius must be a positive number of kilometers. radius_km = {radius_km}"
        )))
    }
}

fn validate_coordinates(lat: f64, lon: f64) -> Result<(), QueryError> {
    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(QueryError::IllegalArgs(format!(
            "coordinates out of range. lat = {lat}. lon = {lon}"
        )))
    }
}
