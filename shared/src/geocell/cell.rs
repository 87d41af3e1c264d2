use crate::geocell::{Band, Location, MccMnc};
use chrono::NaiveDate;
use geo::{Point, Polygon};
use std::fmt::{Display, Formatter};

/// One cellular sector as stored in `geocell_cell`, with its joined side tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub id: i64,
    pub lac_tac: String,
    pub ci: Option<i64>,
    pub eci_nci: Option<i64>,
    pub cgi: Option<String>,
    pub paragon_cgi: String,
    pub technology: Technology,
    /// Antenna bearing in degrees, 0..=359.
    pub direction: i32,
    pub name: String,
    pub created: NaiveDate,
    pub modified: NaiveDate,
    pub band: Option<Band>,
    pub location: Option<Location>,
    pub operator: Option<MccMnc>,
    /// Meters from the reference cell; only set on neighbor-radius results.
    pub distance_from_reference: Option<f64>,
}

impl Cell {
    /// External lookup key: the CGI, or the paragon CGI when the CGI is missing.
    pub fn key(&self) -> Option<&str> {
        match self.cgi.as_deref() {
            Some(cgi) if !cgi.is_empty() => Some(cgi),
            _ if !self.paragon_cgi.is_empty() => Some(self.paragon_cgi.as_str()),
            _ => None,
        }
    }

    pub fn point(&self) -> Option<Point<f64>> {
        self.location.as_ref().and_then(|l| l.point)
    }

    pub fn brand(&self) -> Option<&str> {
        self.operator
            .as_ref()
            .map(|o| o.brand.as_str())
            .filter(|b| !b.is_empty())
    }

    pub fn icon_heading(&self) -> i32 {
        icon_heading(self.direction)
    }
}

/// Heading for the cell icon. The icon artwork points south, so the bearing is rotated by 180.
pub fn icon_heading(direction: i32) -> i32 {
    (direction - 180).rem_euclid(360)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Technology {
    Gsm,
    Umts,
    Lte,
    Nr,
    NbIot,
    Unknown(i32),
}

impl Technology {
    pub const fn code(self) -> i32 {
        match self {
            Technology::Gsm => 2,
            Technology::Umts => 3,
            Technology::Lte => 4,
            Technology::Nr => 5,
            Technology::NbIot => 10,
            Technology::Unknown(code) => code,
        }
    }
}

impl From<i32> for Technology {
    fn from(value: i32) -> Self {
        match value {
            2 => Technology::Gsm,
            3 => Technology::Umts,
            4 => Technology::Lte,
            5 => Technology::Nr,
            10 => Technology::NbIot,
            other => Technology::Unknown(other),
        }
    }
}

impl Display for Technology {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Technology::Gsm => write!(f, "2G"),
            Technology::Umts => write!(f, "3G"),
            Technology::Lte => write!(f, "4G"),
            Technology::Nr => write!(f, "5G"),
            Technology::NbIot => write!(f, "NR-IoT"),
            Technology::Unknown(code) => write!(f, "unknown ({code})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PolygonKind {
    Full,
    Short,
}

impl PolygonKind {
    pub const fn column(self) -> &'static str {
        match self {
            PolygonKind::Full => "polygon",
            PolygonKind::Short => "polygon_short",
        }
    }
}

/// Coverage area of one cell, SRID 4326.
#[derive(Debug, Clone, PartialEq)]
pub struct CellPolygon {
    pub id: i64,
    pub cell_id: i64,
    pub kind: PolygonKind,
    pub polygon: Polygon<f64>,
}
