use crate::QueryError;
use chrono::NaiveDate;
use geo::{Point, Rect, coord};

/// Optional restrictions AND-ed onto every search shape. Empty fields impose no restriction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellFilters {
    pub technologies: Vec<i32>,
    pub operators: Vec<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl CellFilters {
    pub fn validate(&self) -> Result<(), QueryError> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(QueryError::IllegalArgs(format!(
                    "end date must not be before start date. start = {start}. end = {end}"
                )));
            }
        }
        Ok(())
    }
}

/// The cell a neighbor search is centered on.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCell {
    pub id: i64,
    pub point: Point<f64>,
    /// Set only when results must share the reference cell's operator brand.
    pub same_network_brand: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellQuery {
    Neighbors {
        reference: ReferenceCell,
        radius_km: f64,
    },
    Circle {
        center: Point<f64>,
        radius_km: f64,
    },
    /// Always normalized so that `min` is the south-west corner.
    Rectangle(Rect<f64>),
    AdministrativeRegion {
        district: Option<String>,
        county: String,
    },
    LacTac(i64),
    EnbGnb(i64),
    Band(String),
}

impl CellQuery {
    /// Builds a rectangle query from two opposite corners given in any order.
    pub fn rectangle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Self {
        CellQuery::Rectangle(Rect::new(
            coord! { x: lon1, y: lat1 },
            coord! { x: lon2, y: lat2 },
        ))
    }

    pub const fn shape(&self) -> &'static str {
        match self {
            CellQuery::Neighbors { .. } => "neighbors",
            CellQuery::Circle { .. } => "circle",
            CellQuery::Rectangle(_) => "rectangle",
            CellQuery::AdministrativeRegion { .. } => "administrative_region",
            CellQuery::LacTac(_) => "lac_tac",
            CellQuery::EnbGnb(_) => "enb_gnb",
            CellQuery::Band(_) => "band",
        }
    }

    /// Shapes whose results carry a distance to a center point.
    pub const fn is_radial(&self) -> bool {
        matches!(self, CellQuery::Neighbors { .. } | CellQuery::Circle { .. })
    }
}
