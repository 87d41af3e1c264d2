use crate::color::color_for;
use crate::error::ExportError;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

pub const DEFAULT_TARGET: &str = "unknown";

/// One timestamped observation of a cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    /// `YYYY/MM/DD HH:MM:SS`
    pub timestamp: String,
    pub cgi: String,
    /// Already converted to `aabbggrr`. `None` when the row had no color.
    pub color: Option<String>,
    pub target: String,
    pub notes: String,
}

#[derive(Debug, Deserialize)]
struct RawRecord {
    timestamp: Option<String>,
    cgi: Option<String>,
    color: Option<String>,
    target: Option<String>,
    notes: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl RawRecord {
    fn into_record(self) -> Option<CsvRecord> {
        Some(CsvRecord {
            cgi: non_empty(self.cgi)?,
            timestamp: non_empty(self.timestamp).unwrap_or_default(),
            color: non_empty(self.color).map(|name| color_for(&name).to_string()),
            target: non_empty(self.target).unwrap_or_else(|| DEFAULT_TARGET.to_string()),
            notes: non_empty(self.notes).unwrap_or_default(),
        })
    }
}

pub fn read_csv_path(path: &Path) -> Result<Vec<CsvRecord>, ExportError> {
    let file = std::fs::File::open(path)?;
    read_csv(file)
}

/// Parses observations from a CSV with a `timestamp,cgi,color,target,notes` header.
/// Rows that do not parse or have no CGI are skipped.
pub fn read_csv(reader: impl Read) -> Result<Vec<CsvRecord>, ExportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (line, result) in csv_reader.deserialize::<RawRecord>().enumerate() {
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!(row = line + 1, error = %e, "skipping malformed CSV row");
                continue;
            }
        };
        match raw.into_record() {
            Some(record) => records.push(record),
            None => warn!(row = line + 1, "skipping CSV row without a CGI"),
        }
    }

    debug!(count = records.len(), "CSV observations read");
    Ok(records)
}

/// The distinct CGIs referenced by `records`, in sorted order.
pub fn distinct_cgis(records: &[CsvRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.cgi.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
