use geo::Point;

#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: i64,
    /// WGS84 point, x = longitude, y = latitude.
    pub point: Option<Point<f64>>,
    pub address: String,
    pub address2: String,
    pub postal_code_4: String,
    pub postal_code_3: String,
    pub county: Option<County>,
}

impl Location {
    pub fn postal_code(&self) -> String {
        match (self.postal_code_4.is_empty(), self.postal_code_3.is_empty()) {
            (true, _) => String::new(),
            (false, true) => self.postal_code_4.clone(),
            (false, false) => format!("{}-{}", self.postal_code_4, self.postal_code_3),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct County {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub district: Option<District>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct District {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub country: Option<Country>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub id: i64,
    pub name: String,
    pub code: String,
}
