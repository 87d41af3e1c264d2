use crate::error::ExportError;
use std::fs::File;
use std::io::{Seek, Write};
use std::path::Path;
use tracing::info;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

/// The only entry of a KMZ archive.
pub const KML_ENTRY: &str = "doc.kml";

/// Writes `kml` as the single deflated `doc.kml` entry of a new archive at `path`.
pub fn write_kmz(path: &Path, kml: &[u8]) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_kmz_to(file, kml)?;
    info!(path = %path.display(), bytes = kml.len(), "kmz written");
    Ok(())
}

pub fn write_kmz_to<W: Write + Seek>(writer: W, kml: &[u8]) -> Result<W, ExportError> {
    let mut zip_writer = ZipWriter::new(writer);
    let options =
        SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    zip_writer.start_file(KML_ENTRY, options)?;
    zip_writer.write_all(kml)?;
    Ok(zip_writer.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    #[test]
    fn archive_holds_exactly_doc_kml() {
        let kml = br#"<?xml version="1.0" encoding="UTF-8"?><kml/>"#;
        let cursor = write_kmz_to(Cursor::new(Vec::new()), kml).unwrap();

        let mut archive = zip::ZipArchive::new(cursor).unwrap();
        assert_eq!(archive.len(), 1);
        let mut entry = archive.by_name(KML_ENTRY).unwrap();
        assert_eq!(entry.compression(), zip::CompressionMethod::Deflated);
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).unwrap();
        assert_eq!(contents, kml);
    }
}
