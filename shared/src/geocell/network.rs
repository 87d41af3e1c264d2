/// Frequency band details attached to a cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub id: i64,
    pub band: String,
    pub bandwidth: Option<f64>,
    pub uplink_frequency: Option<f64>,
    pub downlink_frequency: Option<f64>,
    pub earfcn: Option<i32>,
}

/// Mobile network operator. `brand`, not the legal `operator` name, drives filtering and colors.
#[derive(Debug, Clone, PartialEq)]
pub struct MccMnc {
    pub id: i64,
    pub mcc: Option<i32>,
    pub mnc: Option<i32>,
    pub operator: String,
    pub brand: String,
    pub status: String,
    pub bands: String,
    pub notes: String,
}
