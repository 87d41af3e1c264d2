use crate::database::models::{CellRow, PolygonRow};
use crate::error::MappingError;
use geo::{Point, Polygon};
use geojson::GeoJson;
use shared::geocell::{
    Band, Cell, CellPolygon, Country, County, District, Location, MccMnc, PolygonKind,
};

/// Builds a [`Cell`] from one joined row.
///
/// A joined entity is present only when its primary key column is non-null, so
/// the all-null columns a left join produces never turn into empty entities.
pub fn map_cell_row(row: CellRow) -> Result<Cell, MappingError> {
    let cell_id = row.cell_id;
    let missing = |column: &'static str| MappingError::MissingColumn { column, cell_id };

    let id = row.cell_id.ok_or_else(|| missing("id"))?;
    let lac_tac = row.lac_tac.ok_or_else(|| missing("lac_tac"))?;
    let technology = row.technology.ok_or_else(|| missing("technology"))?;
    let direction = row.direction.ok_or_else(|| missing("direction"))?;
    let created = row.created.ok_or_else(|| missing("created"))?;
    let modified = row.modified.ok_or_else(|| missing("modified"))?;

    let country = row.country_id.map(|id| Country {
        id,
        name: row.country_name.unwrap_or_default(),
        code: row.country_code.unwrap_or_default(),
    });
    let district = row.district_id.map(|id| District {
        id,
        name: row.district_name.unwrap_or_default(),
        code: row.district_code.unwrap_or_default(),
        country,
    });
    let county = row.county_id.map(|id| County {
        id,
        name: row.county_name.unwrap_or_default(),
        code: row.county_code.unwrap_or_default(),
        district,
    });
    let location = row.location_id.map(|id| Location {
        id,
        point: match (row.longitude, row.latitude) {
            (Some(lon), Some(lat)) => Some(Point::new(lon, lat)),
            _ => None,
        },
        address: row.address.unwrap_or_default(),
        address2: row.address2.unwrap_or_default(),
        postal_code_4: row.postal_code_4.unwrap_or_default(),
        postal_code_3: row.postal_code_3.unwrap_or_default(),
        county,
    });

    let operator = row.mccmnc_id.map(|id| MccMnc {
        id,
        mcc: row.mcc,
        mnc: row.mnc,
        operator: row.operator.unwrap_or_default(),
        brand: row.brand.unwrap_or_default(),
        status: row.operator_status.unwrap_or_default(),
        bands: row.operator_bands.unwrap_or_default(),
        notes: row.operator_notes.unwrap_or_default(),
    });

    let band = row.band_id.map(|id| Band {
        id,
        band: row.band.unwrap_or_default(),
        bandwidth: row.bandwidth,
        uplink_frequency: row.uplink_frequency,
        downlink_frequency: row.downlink_frequency,
        earfcn: row.earfcn,
    });

    Ok(Cell {
        id,
        lac_tac,
        ci: row.ci,
        eci_nci: row.eci_nci,
        cgi: row.cgi,
        paragon_cgi: row.paragon_cgi.unwrap_or_default(),
        technology: technology.into(),
        direction,
        name: row.cell_name.unwrap_or_default(),
        created,
        modified,
        band,
        location,
        operator,
        distance_from_reference: None,
    })
}

/// Decodes a polygon row whose geometry was selected with `ST_AsGeoJSON`.
pub fn map_polygon_row(row: PolygonRow, kind: PolygonKind) -> Option<CellPolygon> {
    let polygon = polygon_from_geojson(row.geojson.as_deref()?)?;
    Some(CellPolygon {
        id: row.id,
        cell_id: row.cell_id,
        kind,
        polygon,
    })
}

fn polygon_from_geojson(geojson_str: &str) -> Option<Polygon<f64>> {
    let geojson: GeoJson = geojson_str.parse().ok()?;
    if let GeoJson::Geometry(geom) = geojson {
        let geo_geom: geo::Geometry<f64> = geom.try_into().ok()?;
        match geo_geom {
            geo::Geometry::Polygon(p) => Some(p),
            geo::Geometry::MultiPolygon(mp) => mp.0.into_iter().next(),
            _ => None,
        }
    } else {
        None
    }
}
