use crate::database::mapper::{map_cell_row, map_polygon_row};
use crate::database::models::{CellHit, CellRow, PolygonRow};
use crate::error::QueryError;
use crate::filters::{CellFilters, CellQuery};
use crate::MAX_RESULT_ROWS;
use geo::Point;
use shared::geocell::{Cell, CellPolygon, PolygonKind};
use sqlx::{Executor, Postgres, QueryBuilder};
use tracing::warn;

const CELL_SELECT: &str = r"
        SELECT
            c.id AS cell_id, c.lac_tac, c.ci, c.eci_nci, c.cgi, c.paragon_cgi,
            c.technology, c.direction, c.name AS cell_name, c.created, c.modified,
            l.id AS location_id, ST_Y(l.point) AS latitude, ST_X(l.point) AS longitude,
            l.address, l.address2, l.postal_code_4, l.postal_code_3,
            co.id AS county_id, co.name AS county_name, co.code AS county_code,
            d.id AS district_id, d.name AS district_name, d.code AS district_code,
            ct.id AS country_id, ct.name AS country_name, ct.code AS country_code,
            m.id AS mccmnc_id, m.mcc, m.mnc, m.operator, m.brand,
            m.status AS operator_status, m.bands AS operator_bands, m.notes AS operator_notes,
            b.id AS band_id, b.band, b.bandwidth, b.uplink_frequency, b.downlink_frequency, b.earfcn
        FROM geocell_cell c
        LEFT JOIN geocell_location l ON l.id = c.location_id
        LEFT JOIN geocell_county co ON co.id = l.county_id
        LEFT JOIN geocell_district d ON d.id = co.district_id
        LEFT JOIN geocell_country ct ON ct.id = d.country_id
        LEFT JOIN geocell_mccmnc m ON m.id = c.mccmnc_id
        LEFT JOIN geocell_band b ON b.id = c.band_id
        ";

/// Builds the phase-one statement selecting ids of cells matching `query` and `filters`.
pub fn build_find_ids(query: &CellQuery, filters: &CellFilters) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT DISTINCT c.id, ");

    match query {
        CellQuery::Neighbors { reference, .. } => {
            qb.push("ST_Distance(l.point::geography, ");
            push_geography_point(&mut qb, reference.point);
            qb.push(") AS distance");
        }
        CellQuery::Circle { center, .. } => {
            qb.push("ST_Distance(l.point::geography, ");
            push_geography_point(&mut qb, *center);
            qb.push(") AS distance");
        }
        _ => {
            qb.push("NULL::DOUBLE PRECISION AS distance");
        }
    }

    qb.push(
        " FROM geocell_cell c \
         LEFT JOIN geocell_location l ON l.id = c.location_id \
         LEFT JOIN geocell_mccmnc m ON m.id = c.mccmnc_id",
    );

    match query {
        CellQuery::AdministrativeRegion { .. } => {
            qb.push(
                " JOIN geocell_county co ON co.id = l.county_id \
                 LEFT JOIN geocell_district d ON d.id = co.district_id",
            );
        }
        CellQuery::EnbGnb(_) => {
            qb.push(" JOIN geocell_enbgnb e ON e.id = c.enbgnb_id");
        }
        CellQuery::Band(_) => {
            qb.push(" JOIN geocell_band b ON b.id = c.band_id");
        }
        _ => {}
    }

    qb.push(" WHERE TRUE");
    push_shape_predicate(&mut qb, query);
    push_filters(&mut qb, filters);

    if query.is_radial() {
        qb.push(" ORDER BY distance, c.id");
    } else {
        qb.push(" ORDER BY c.id");
    }
    qb.push(" LIMIT ").push_bind(MAX_RESULT_ROWS);
    qb
}

fn push_geography_point(qb: &mut QueryBuilder<'static, Postgres>, point: Point<f64>) {
    qb.push("ST_SetSRID(ST_MakePoint(")
        .push_bind(point.x())
        .push(", ")
        .push_bind(point.y())
        .push("), 4326)::geography");
}

fn push_within_distance(qb: &mut QueryBuilder<'static, Postgres>, center: Point<f64>, radius_km: f64) {
    qb.push(" AND l.point IS NOT NULL AND ST_DWithin(l.point::geography, ");
    push_geography_point(qb, center);
    qb.push(", ").push_bind(radius_km * 1000.0).push(")");
}

fn push_shape_predicate(qb: &mut QueryBuilder<'static, Postgres>, query: &CellQuery) {
    match query {
        CellQuery::Neighbors {
            reference,
            radius_km,
        } => {
            push_within_distance(qb, reference.point, *radius_km);
            qb.push(" AND c.id <> ").push_bind(reference.id);
            if let Some(brand) = &reference.same_network_brand {
                qb.push(" AND m.brand = ").push_bind(brand.clone());
            }
        }
        CellQuery::Circle { center, radius_km } => {
            push_within_distance(qb, *center, *radius_km);
        }
        CellQuery::Rectangle(rect) => {
            qb.push(" AND ST_Within(l.point, ST_MakeEnvelope(")
                .push_bind(rect.min().x)
                .push(", ")
                .push_bind(rect.min().y)
                .push(", ")
                .push_bind(rect.max().x)
                .push(", ")
                .push_bind(rect.max().y)
                .push(", 4326))");
        }
        CellQuery::AdministrativeRegion { district, county } => {
            qb.push(" AND co.name = ").push_bind(county.clone());
            if let Some(district) = district {
                qb.push(" AND d.name = ").push_bind(district.clone());
            }
        }
        CellQuery::LacTac(lac_tac) => {
            qb.push(" AND c.lac_tac = ").push_bind(lac_tac.to_string());
        }
        CellQuery::EnbGnb(enb_gnb) => {
            qb.push(" AND e.enb_gnb_id = ").push_bind(*enb_gnb);
        }
        CellQuery::Band(band) => {
            qb.push(" AND b.band = ").push_bind(band.clone());
        }
    }
}

fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &CellFilters) {
    if !filters.technologies.is_empty() {
        qb.push(" AND c.technology = ANY(")
            .push_bind(filters.technologies.clone())
            .push(")");
    }
    if !filters.operators.is_empty() {
        qb.push(" AND m.brand = ANY(")
            .push_bind(filters.operators.clone())
            .push(")");
    }
    if let Some(start) = filters.start_date {
        qb.push(" AND c.created >= ").push_bind(start);
    }
    if let Some(end) = filters.end_date {
        qb.push(" AND c.created <= ").push_bind(end);
    }
}

pub async fn find_cell_ids<'e, E>(
    executor: E,
    query: &CellQuery,
    filters: &CellFilters,
) -> Result<Vec<CellHit>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    build_find_ids(query, filters)
        .build_query_as::<CellHit>()
        .fetch_all(executor)
        .await
        .map_err(QueryError::from)
}

pub async fn fetch_cells_by_ids<'e, E>(executor: E, ids: &[i64]) -> Result<Vec<Cell>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let query = format!("{CELL_SELECT} WHERE c.id = ANY($1) ORDER BY c.id");
    let rows = sqlx::query_as::<_, CellRow>(&query)
        .bind(ids)
        .fetch_all(executor)
        .await?;

    rows.into_iter()
        .map(|row| map_cell_row(row).map_err(QueryError::from))
        .collect()
}

/// Exact-match lookup on `cgi`, falling back to `paragon_cgi`.
pub async fn fetch_cells_by_keys<'e, E>(
    executor: E,
    keys: &[String],
) -> Result<Vec<Cell>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let query =
        format!("{CELL_SELECT} WHERE c.cgi = ANY($1) OR c.paragon_cgi = ANY($1) ORDER BY c.id");
    let rows = sqlx::query_as::<_, CellRow>(&query)
        .bind(keys)
        .fetch_all(executor)
        .await?;

    rows.into_iter()
        .map(|row| map_cell_row(row).map_err(QueryError::from))
        .collect()
}

pub async fn fetch_cell_polygons<'e, E>(
    executor: E,
    cell_ids: &[i64],
    kind: PolygonKind,
) -> Result<Vec<CellPolygon>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    let column = kind.column();
    let query = format!(
        r"
        SELECT p.id, p.cell_id, ST_AsGeoJSON(p.{column}) AS geojson
        FROM geocell_cellpolygon p
        WHERE p.cell_id = ANY($1) AND p.{column} IS NOT NULL
        ORDER BY p.cell_id, p.id
        "
    );
    let rows = sqlx::query_as::<_, PolygonRow>(&query)
        .bind(cell_ids)
        .fetch_all(executor)
        .await?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            let (id, cell_id) = (row.id, row.cell_id);
            let polygon = map_polygon_row(row, kind);
            if polygon.is_none() {
                warn!(polygon_id = id, cell_id, "skipping polygon with undecodable geometry");
            }
            polygon
        })
        .collect())
}

pub async fn list_districts<'e, E>(executor: E) -> Result<Vec<String>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, String>("SELECT name FROM geocell_district ORDER BY name")
        .fetch_all(executor)
        .await
        .map_err(QueryError::from)
}

pub async fn list_counties<'e, E>(
    executor: E,
    district: Option<&str>,
) -> Result<Vec<String>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, String>(
        r"
        SELECT co.name
        FROM geocell_county co
        LEFT JOIN geocell_district d ON d.id = co.district_id
        WHERE $1::TEXT IS NULL OR d.name = $1
        ORDER BY co.name
        ",
    )
    .bind(district)
    .fetch_all(executor)
    .await
    .map_err(QueryError::from)
}

pub async fn list_operator_brands<'e, E>(executor: E) -> Result<Vec<String>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, String>(
        r"
        SELECT DISTINCT brand
        FROM geocell_mccmnc
        WHERE brand IS NOT NULL AND brand <> ''
        ORDER BY brand
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(QueryError::from)
}

pub async fn list_bands<'e, E>(executor: E) -> Result<Vec<String>, QueryError>
where
    E: Executor<'e, Database = Postgres>,
{
    sqlx::query_scalar::<_, String>(
        r"
        SELECT DISTINCT band
        FROM geocell_band
        WHERE band <> ''
        ORDER BY band
        ",
    )
    .fetch_all(executor)
    .await
    .map_err(QueryError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::ReferenceCell;
    use chrono::NaiveDate;

    fn normalized(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn neighbor_query_excludes_reference_and_orders_by_distance() {
        let query = CellQuery::Neighbors {
            reference: ReferenceCell {
                id: 17,
                point: Point::new(-9.1, 38.7),
                same_network_brand: None,
            },
            radius_km: 2.5,
        };
        let qb = build_find_ids(&query, &CellFilters::default());
        let sql = normalized(qb.sql());

        assert!(sql.starts_with(
            "SELECT DISTINCT c.id, ST_Distance(l.point::geography, ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography) AS distance"
        ));
        assert!(sql.contains(
            "AND l.point IS NOT NULL AND ST_DWithin(l.point::geography, ST_SetSRID(ST_MakePoint($3, $4), 4326)::geography, $5)"
        ));
        assert!(sql.contains("AND c.id <> $6"));
        assert!(!sql.contains("m.brand"));
        assert!(sql.ends_with("ORDER BY distance, c.id LIMIT $7"));
    }

    #[test]
    fn same_network_restricts_to_reference_brand() {
        let query = CellQuery::Neighbors {
            reference: ReferenceCell {
                id: 17,
                point: Point::new(-9.1, 38.7),
                same_network_brand: Some("NOS".into()),
            },
            radius_km: 1.0,
        };
        let sql = normalized(build_find_ids(&query, &CellFilters::default()).sql());
        assert!(sql.contains("AND c.id <> $6 AND m.brand = $7"));
    }

    #[test]
    fn rectangle_uses_envelope_containment() {
        let query = CellQuery::rectangle(38.8, -9.0, 38.6, -9.3);
        let sql = normalized(build_find_ids(&query, &CellFilters::default()).sql());
        assert!(sql.contains("NULL::DOUBLE PRECISION AS distance"));
        assert!(sql.contains("AND ST_Within(l.point, ST_MakeEnvelope($1, $2, $3, $4, 4326))"));
        assert!(sql.ends_with("ORDER BY c.id LIMIT $5"));
    }

    #[test]
    fn administrative_region_joins_county_and_district() {
        let query = CellQuery::AdministrativeRegion {
            district: Some("Lisboa".into()),
            county: "Sintra".into(),
        };
        let sql = normalized(build_find_ids(&query, &CellFilters::default()).sql());
        assert!(sql.contains("JOIN geocell_county co ON co.id = l.county_id"));
        assert!(sql.contains("LEFT JOIN geocell_district d ON d.id = co.district_id"));
        assert!(sql.contains("AND co.name = $1 AND d.name = $2"));

        let county_only = CellQuery::AdministrativeRegion {
            district: None,
            county: "Sintra".into(),
        };
        let sql = normalized(build_find_ids(&county_only, &CellFilters::default()).sql());
        assert!(sql.contains("AND co.name = $1"));
        assert!(!sql.contains("d.name ="));
    }

    #[test]
    fn attribute_lookups_join_their_tables() {
        let sql = normalized(build_find_ids(&CellQuery::LacTac(8840), &CellFilters::default()).sql());
        assert!(sql.contains("AND c.lac_tac = $1"));

        let sql = normalized(build_find_ids(&CellQuery::EnbGnb(123_456), &CellFilters::default()).sql());
        assert!(sql.contains("JOIN geocell_enbgnb e ON e.id = c.enbgnb_id"));
        assert!(sql.contains("AND e.enb_gnb_id = $1"));

        let sql = normalized(build_find_ids(&CellQuery::Band("B20".into()), &CellFilters::default()).sql());
        assert!(sql.contains("JOIN geocell_band b ON b.id = c.band_id"));
        assert!(sql.contains("AND b.band = $1"));
    }

    #[test]
    fn filters_are_anded_after_the_shape() {
        let filters = CellFilters {
            technologies: vec![4, 5],
            operators: vec!["MEO".into()],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
            end_date: NaiveDate::from_ymd_opt(2024, 12, 31),
        };
        let sql = normalized(build_find_ids(&CellQuery::LacTac(1), &filters).sql());
        assert!(sql.contains(
            "AND c.lac_tac = $1 AND c.technology = ANY($2) AND m.brand = ANY($3) AND c.created >= $4 AND c.created <= $5"
        ));
        assert!(sql.ends_with("LIMIT $6"));
    }

    #[test]
    fn user_values_never_reach_sql_text() {
        let query = CellQuery::Band("B3'; DROP TABLE geocell_cell; --".into());
        let filters = CellFilters {
            operators: vec!["Vodafone' OR '1'='1".into()],
            ..CellFilters::default()
        };
        let sql = build_find_ids(&query, &filters).sql().to_string();
        assert!(!sql.contains("DROP TABLE"));
        assert!(!sql.contains("Vodafone"));
    }
}
