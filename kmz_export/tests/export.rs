use chrono::NaiveDate;
use geo::{LineString, Point, Polygon};
use kmz_export::{KmzDocument, Layout, export_kmz, read_csv};
use quick_xml::Reader;
use quick_xml::events::Event;
use shared::ExportConfig;
use shared::geocell::{Cell, CellPolygon, Location, PolygonKind, Technology};
use std::collections::{BTreeMap, HashMap};
use std::io::Read;
use std::path::Path;

fn lte_cell(id: i64, cgi: &str, name: &str) -> Cell {
    Cell {
        id,
        lac_tac: "8840".into(),
        ci: None,
        eci_nci: Some(8453),
        cgi: Some(cgi.into()),
        paragon_cgi: String::new(),
        technology: Technology::Lte,
        direction: 0,
        name: name.into(),
        created: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        modified: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        band: None,
        location: Some(Location {
            id,
            point: Some(Point::new(-9.1, 38.7)),
            address: String::new(),
            address2: String::new(),
            postal_code_4: String::new(),
            postal_code_3: String::new(),
            county: None,
        }),
        operator: None,
        distance_from_reference: None,
    }
}

fn read_doc_kml(path: &Path) -> String {
    let file = std::fs::File::open(path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    assert_eq!(archive.len(), 1);
    let mut kml = String::new();
    archive
        .by_name("doc.kml")
        .unwrap()
        .read_to_string(&mut kml)
        .unwrap();
    kml
}

/// Walks the whole document, failing on malformed XML, and returns the text of every `<name>`.
fn names(kml: &str) -> Vec<String> {
    let mut reader = Reader::from_str(kml);
    let mut names = Vec::new();
    let mut in_name = false;
    loop {
        match reader.read_event().unwrap() {
            Event::Start(e) if e.name().as_ref() == b"name" => in_name = true,
            Event::End(e) if e.name().as_ref() == b"name" => in_name = false,
            Event::Text(t) if in_name => names.push(t.unescape().unwrap().into_owned()),
            Event::Eof => break,
            _ => {}
        }
    }
    names
}

fn placemarks_in(kml: &str) -> usize {
    kml.matches("<Placemark>").count()
}

#[test]
fn csv_observation_end_to_end() {
    let csv = "timestamp,cgi,color,target,notes\n\
        2025/04/26 00:02:34,268-06-8840-8453,red,coverage,\"test\"\n\
        2025/04/26 00:09:00,268-06-0000-0000,blue,other,\n";
    let records = read_csv(csv.as_bytes()).unwrap();
    assert_eq!(records.len(), 2);

    // Only the first CGI exists in the database
    let cells = BTreeMap::from([(
        "268-06-8840-8453".to_string(),
        lte_cell(1, "268-06-8840-8453", "Baixa"),
    )]);
    let polygons = HashMap::from([(
        1,
        vec![CellPolygon {
            id: 1,
            cell_id: 1,
            kind: PolygonKind::Full,
            polygon: Polygon::new(
                LineString::from(vec![(-9.1, 38.7), (-9.0, 38.7), (-9.0, 38.8), (-9.1, 38.7)]),
                vec![],
            ),
        }],
    )]);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("observations.kmz");
    let config = ExportConfig::default();
    let drawn = export_kmz(
        &path,
        &KmzDocument {
            cells: &cells,
            polygons: &polygons,
            layout: Layout::Timeline(&records),
            config: &config,
        },
    )
    .unwrap();
    assert_eq!(drawn, 1);

    let kml = read_doc_kml(&path);
    assert!(kml.contains(r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#));
    assert_eq!(
        names(&kml),
        vec![
            config.document_name.as_str(),
            "2025/04/26",
            "Points",
            "00:02:34",
            "Polygons",
            "268-06-8840-8453",
        ]
    );
    assert_eq!(placemarks_in(&kml), 2);
    assert!(kml.contains("<color>ff0000ff</color>"));
    assert!(kml.contains("<color>4f0000ff</color>"));
    assert!(kml.contains("<heading>180</heading>"));
    assert!(kml.contains("Target: coverage"));
    assert!(kml.contains("Notes: test"));
    assert!(kml.contains("Technology: 4G"));
    assert!(kml.contains("<coordinates>-9.1,38.7,50</coordinates>"));
}

#[test]
fn empty_collection_still_makes_an_openable_kmz() {
    let cells = BTreeMap::new();
    let polygons = HashMap::new();
    let config = ExportConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.kmz");

    let drawn = export_kmz(
        &path,
        &KmzDocument {
            cells: &cells,
            polygons: &polygons,
            layout: Layout::Flat,
            config: &config,
        },
    )
    .unwrap();
    assert_eq!(drawn, 0);

    let kml = read_doc_kml(&path);
    assert_eq!(
        names(&kml),
        vec![config.document_name.as_str(), "Cells", "Points", "Polygons"]
    );
    assert_eq!(placemarks_in(&kml), 0);

    // Observations that match no cell still leave the folder skeleton
    let csv = "timestamp,cgi\n2025/04/26 00:02:34,268-06-0000-0000\n";
    let records = read_csv(csv.as_bytes()).unwrap();
    let path = dir.path().join("unmatched.kmz");
    let drawn = export_kmz(
        &path,
        &KmzDocument {
            cells: &cells,
            polygons: &polygons,
            layout: Layout::Timeline(&records),
            config: &config,
        },
    )
    .unwrap();
    assert_eq!(drawn, 0);

    let kml = read_doc_kml(&path);
    assert_eq!(
        names(&kml),
        vec![config.document_name.as_str(), "No observations", "Points", "Polygons"]
    );
    assert_eq!(placemarks_in(&kml), 0);
}

#[test]
fn observations_may_name_the_paragon_cgi() {
    let mut cell = lte_cell(1, "268-06-1-1", "Baixa");
    cell.paragon_cgi = "P-1".into();
    let cells = BTreeMap::from([("268-06-1-1".to_string(), cell)]);
    let polygons = HashMap::new();
    let csv = "timestamp,cgi,color,target,notes\n2025/04/26 00:02:34,P-1,red,t,n\n";
    let records = read_csv(csv.as_bytes()).unwrap();
    let config = ExportConfig::default();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("paragon.kmz");

    let drawn = export_kmz(
        &path,
        &KmzDocument {
            cells: &cells,
            polygons: &polygons,
            layout: Layout::Timeline(&records),
            config: &config,
        },
    )
    .unwrap();
    assert_eq!(drawn, 1);

    let kml = read_doc_kml(&path);
    assert_eq!(placemarks_in(&kml), 1);
    assert!(kml.contains("Target: t"));
}

#[test]
fn hostile_names_stay_well_formed() {
    let name = r#"<Site> & "Tower" 'A'"#;
    let cells = BTreeMap::from([("A&B".to_string(), lte_cell(1, "A&B", name))]);
    let polygons = HashMap::new();
    let config = ExportConfig {
        document_name: "Export <1>".into(),
        ..ExportConfig::default()
    };
    let kml = String::from_utf8(
        KmzDocument {
            cells: &cells,
            polygons: &polygons,
            layout: Layout::Flat,
            config: &config,
        }
        .render()
        .unwrap(),
    )
    .unwrap();

    assert!(kml.contains("Name: &lt;Site&gt; &amp; &quot;Tower&quot; &apos;A&apos;"));
    assert!(kml.contains("<name>A&amp;B</name>"));
    assert!(!kml.contains(name));
    assert_eq!(names(&kml), vec!["Export <1>", "Cells", "Points", "A&B", "Polygons"]);
}
