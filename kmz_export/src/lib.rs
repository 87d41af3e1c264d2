#![warn(clippy::pedantic)]
//! KMZ export of cell collections for Google Earth.

pub mod archive;
pub mod color;
pub mod csv_ingest;
pub mod document;
pub mod error;
pub mod kml;

pub use archive::write_kmz;
pub use csv_ingest::{CsvRecord, distinct_cgis, read_csv, read_csv_path};
pub use document::{KmzDocument, Layout};
pub use error::ExportError;

use std::path::Path;

/// Renders `document` and writes it to `path` as a KMZ archive.
///
/// Returns the number of distinct cells drawn in the archive.
pub fn export_kmz(path: &Path, document: &KmzDocument) -> Result<usize, ExportError> {
    let kml = document.render()?;
    write_kmz(path, &kml)?;
    Ok(document.drawn_cells())
}
