use crate::color::{brand_color, make_transparent, technology_color};
use crate::csv_ingest::CsvRecord;
use crate::error::ExportError;
use crate::kml::{Element, KML_NAMESPACE, to_xml_bytes};
use geo::{Point, Polygon};
use shared::ExportConfig;
use shared::geocell::{Cell, CellPolygon};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Markers are drawn this many meters above ground, regardless of antenna height.
pub const MARKER_ALTITUDE_M: f64 = 50.0;

const ALTITUDE_MODE: &str = "relativeToGround";
const FLAT_FOLDER_NAME: &str = "Cells";
const NO_OBSERVATIONS_FOLDER_NAME: &str = "No observations";

/// How cells are arranged into folders.
#[derive(Debug, Clone, Copy)]
pub enum Layout<'a> {
    /// One folder per observation date, one point per observation.
    Timeline(&'a [CsvRecord]),
    /// A single folder with one point per cell, named by CGI.
    Flat,
}

/// Everything needed to render one KML document.
pub struct KmzDocument<'a> {
    /// Cells keyed by CGI. Observations may also name a cell by its paragon CGI.
    pub cells: &'a BTreeMap<String, Cell>,
    pub polygons: &'a HashMap<i64, Vec<CellPolygon>>,
    pub layout: Layout<'a>,
    pub config: &'a ExportConfig,
}

/// One rendered point: the cell, where it is drawn, and the observation that put it there.
struct Marker<'a> {
    name: &'a str,
    cell: &'a Cell,
    point: Point<f64>,
    color: String,
    observation: Option<&'a CsvRecord>,
}

impl<'a> KmzDocument<'a> {
    pub fn render(&self) -> Result<Vec<u8>, ExportError> {
        to_xml_bytes(&self.build())
    }

    pub fn build(&self) -> Element {
        let mut document = Element::new("Document").child(Element::text(
            "name",
            self.config.document_name.as_str(),
        ));

        match self.layout {
            Layout::Timeline(records) => {
                let by_date = self.group_by_date(records);
                if by_date.is_empty() {
                    document.push(self.folder(NO_OBSERVATIONS_FOLDER_NAME, &[]));
                }
                for (date, markers) in by_date {
                    document.push(self.folder(date, &markers));
                }
            }
            Layout::Flat => {
                let markers = self.flat_markers();
                document.push(self.folder(FLAT_FOLDER_NAME, &markers));
            }
        }

        Element::new("kml").attr("xmlns", KML_NAMESPACE).child(document)
    }

    /// Number of distinct cells that get a point placemark.
    pub fn drawn_cells(&self) -> usize {
        let ids: HashSet<i64> = match self.layout {
            Layout::Timeline(records) => self
                .group_by_date(records)
                .values()
                .flatten()
                .map(|m| m.cell.id)
                .collect(),
            Layout::Flat => self.flat_markers().iter().map(|m| m.cell.id).collect(),
        };
        ids.len()
    }

    /// Observations joined against the cells, grouped by date and sorted by time of day.
    fn group_by_date(&self, records: &'a [CsvRecord]) -> BTreeMap<&'a str, Vec<Marker<'a>>> {
        let by_paragon: HashMap<&str, &Cell> = self
            .cells
            .values()
            .filter(|c| !c.paragon_cgi.is_empty())
            .map(|c| (c.paragon_cgi.as_str(), c))
            .collect();

        let mut by_date: BTreeMap<&str, Vec<Marker>> = BTreeMap::new();
        for record in records {
            let cgi = record.cgi.as_str();
            let Some(cell) = self.cells.get(cgi).or_else(|| by_paragon.get(cgi).copied()) else {
                debug!(cgi = %record.cgi, "observation has no matching cell");
                continue;
            };
            let Some(point) = cell.point() else {
                debug!(cgi = %record.cgi, "observed cell has no coordinates");
                continue;
            };

            let (date, time) = record
                .timestamp
                .split_once(' ')
                .unwrap_or((record.timestamp.as_str(), ""));
            let color = record
                .color
                .clone()
                .unwrap_or_else(|| technology_color(cell.technology).to_string());

            by_date.entry(date).or_default().push(Marker {
                name: time,
                cell,
                point,
                color,
                observation: Some(record),
            });
        }

        for markers in by_date.values_mut() {
            markers.sort_by(|a, b| a.name.cmp(b.name));
        }
        by_date
    }

    fn flat_markers(&self) -> Vec<Marker<'a>> {
        self.cells
            .iter()
            .filter_map(|(cgi, cell)| {
                Some(Marker {
                    name: cgi.as_str(),
                    cell,
                    point: cell.point()?,
                    color: brand_color(cell.brand()).to_string(),
                    observation: None,
                })
            })
            .collect()
    }

    fn folder(&self, name: &str, markers: &[Marker]) -> Element {
        let mut points = Element::new("Folder").child(Element::text("name", "Points"));
        let mut polygons = Element::new("Folder").child(Element::text("name", "Polygons"));

        let mut drawn = HashSet::new();
        for marker in markers {
            points.push(self.point_placemark(marker));

            // A cell observed several times in one folder gets its polygons once
            if !drawn.insert(marker.cell.id) {
                continue;
            }
            let fill = make_transparent(&marker.color);
            for polygon in self.polygons.get(&marker.cell.id).into_iter().flatten() {
                polygons.push(polygon_placemark(marker.cell, &polygon.polygon, &fill));
            }
        }

        Element::new("Folder")
            .child(Element::text("name", name))
            .child(points)
            .child(polygons)
    }

    fn point_placemark(&self, marker: &Marker) -> Element {
        let icon_style = Element::new("IconStyle")
            .child(Element::text("color", marker.color.as_str()))
            .child(Element::text("heading", marker.cell.icon_heading().to_string()))
            .child(Element::new("Icon").child(Element::text("href", self.config.icon_href.as_str())));

        Element::new("Placemark")
            .child(Element::text("name", marker.name))
            .child(Element::text(
                "description",
                describe(marker.cell, marker.observation),
            ))
            .child(Element::new("Style").child(icon_style))
            .child(
                Element::new("Point")
                    .child(Element::text("altitudeMode", ALTITUDE_MODE))
                    .child(Element::text("coordinates", coordinate(marker.point))),
            )
    }
}

fn polygon_placemark(cell: &Cell, polygon: &Polygon<f64>, fill: &str) -> Element {
    let ring = polygon
        .exterior()
        .points()
        .map(coordinate)
        .collect::<Vec<_>>()
        .join(" ");

    Element::new("Placemark")
        .child(Element::text("name", cell.key().unwrap_or_default()))
        .child(
            Element::new("Style")
                .child(Element::new("PolyStyle").child(Element::text("color", fill))),
        )
        .child(
            Element::new("Polygon")
                .child(Element::text("extrude", "1"))
                .child(Element::text("altitudeMode", ALTITUDE_MODE))
                .child(
                    Element::new("outerBoundaryIs").child(
                        Element::new("LinearRing").child(Element::text("coordinates", ring)),
                    ),
                ),
        )
}

fn coordinate(point: Point<f64>) -> String {
    format!("{},{},{}", point.x(), point.y(), MARKER_ALTITUDE_M)
}

/// Multi-line `Key: value` dump of a cell, followed by the observation annotations.
pub fn describe(cell: &Cell, observation: Option<&CsvRecord>) -> String {
    let mut lines = Vec::new();
    if let Some(observation) = observation {
        lines.push(format!("Timestamp: {}", observation.timestamp));
    }
    lines.push(format!("CGI: {}", cell.key().unwrap_or_default()));
    if !cell.name.is_empty() {
        lines.push(format!("Name: {}", cell.name));
    }
    lines.push(format!("Technology: {}", cell.technology));
    lines.push(format!("LAC/TAC: {}", cell.lac_tac));
    if let Some(ci) = cell.ci {
        lines.push(format!("CI: {ci}"));
    }
    if let Some(eci_nci) = cell.eci_nci {
        lines.push(format!("ECI/NCI: {eci_nci}"));
    }
    lines.push(format!("Direction: {}", cell.direction));

    if let Some(operator) = &cell.operator {
        lines.push(format!("Operator: {}", operator.operator));
        lines.push(format!("Brand: {}", operator.brand));
        if let (Some(mcc), Some(mnc)) = (operator.mcc, operator.mnc) {
            lines.push(format!("MCC/MNC: {mcc}/{mnc:02}"));
        }
    }

    if let Some(band) = &cell.band {
        lines.push(format!("Band: {}", band.band));
        if let Some(earfcn) = band.earfcn {
            lines.push(format!("EARFCN: {earfcn}"));
        }
        if let Some(downlink) = band.downlink_frequency {
            lines.push(format!("Downlink: {downlink} MHz"));
        }
        if let Some(uplink) = band.uplink_frequency {
            lines.push(format!("Uplink: {uplink} MHz"));
        }
        if let Some(bandwidth) = band.bandwidth {
            lines.push(format!("Bandwidth: {bandwidth} MHz"));
        }
    }

    if let Some(location) = &cell.location {
        let address = [location.address.as_str(), location.address2.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ");
        if !address.is_empty() {
            lines.push(format!("Address: {address}"));
        }
        let postal_code = location.postal_code();
        if !postal_code.is_empty() {
            lines.push(format!("Postal code: {postal_code}"));
        }
        if let Some(county) = &location.county {
            lines.push(format!("County: {}", county.name));
            if let Some(district) = &county.district {
                lines.push(format!("District: {}", district.name));
            }
        }
        if let Some(point) = location.point {
            lines.push(format!("Latitude: {}", point.y()));
            lines.push(format!("Longitude: {}", point.x()));
        }
    }

    if let Some(distance) = cell.distance_from_reference {
        lines.push(format!("Distance: {distance:.0} m"));
    }
    lines.push(format!("Created: {}", cell.created));
    lines.push(format!("Modified: {}", cell.modified));

    if let Some(observation) = observation {
        lines.push(format!("Target: {}", observation.target));
        lines.push(format!("Notes: {}", observation.notes));
    }
    lines.join("\n")
}
