use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("kml serialization error: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}
