use chrono::NaiveDate;

/// Phase-one result: a matching cell id, plus its distance in meters for radial shapes.
#[derive(Debug, sqlx::FromRow, Clone, PartialEq)]
pub struct CellHit {
    pub id: i64,
    pub distance: Option<f64>,
}

/// One row of the cell ⋈ location ⋈ county ⋈ district ⋈ country ⋈ operator ⋈ band join.
///
/// Every column is optional here; required cell columns are checked when the
/// row is mapped into a [`shared::geocell::Cell`].
#[derive(Debug, sqlx::FromRow, Clone, Default)]
pub struct CellRow {
    pub cell_id: Option<i64>,
    pub lac_tac: Option<String>,
    pub ci: Option<i64>,
    pub eci_nci: Option<i64>,
    pub cgi: Option<String>,
    pub paragon_cgi: Option<String>,
    pub technology: Option<i32>,
    pub direction: Option<i32>,
    pub cell_name: Option<String>,
    pub created: Option<NaiveDate>,
    pub modified: Option<NaiveDate>,

    pub location_id: Option<i64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub address2: Option<String>,
    pub postal_code_4: Option<String>,
    pub postal_code_3: Option<String>,

    pub county_id: Option<i64>,
    pub county_name: Option<String>,
    pub county_code: Option<String>,
    pub district_id: Option<i64>,
    pub district_name: Option<String>,
    pub district_code: Option<String>,
    pub country_id: Option<i64>,
    pub country_name: Option<String>,
    pub country_code: Option<String>,

    pub mccmnc_id: Option<i64>,
    pub mcc: Option<i32>,
    pub mnc: Option<i32>,
    pub operator: Option<String>,
    pub brand: Option<String>,
    pub operator_status: Option<String>,
    pub operator_bands: Option<String>,
    pub operator_notes: Option<String>,

    pub band_id: Option<i64>,
    pub band: Option<String>,
    pub bandwidth: Option<f64>,
    pub uplink_frequency: Option<f64>,
    pub downlink_frequency: Option<f64>,
    pub earfcn: Option<i32>,
}

#[derive(Debug, sqlx::FromRow, Clone)]
pub struct PolygonRow {
    pub id: i64,
    pub cell_id: i64,
    pub geojson: Option<String>,
}
