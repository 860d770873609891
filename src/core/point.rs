use chrono::{DateTime, Local};

/// A single measurement at an instant.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    derive_more::Constructor,
    serde::Deserialize,
    serde::Serialize,
)]
pub struct DataPoint {
    #[serde(rename = "x")]
    pub timestamp: DateTime<Local>,

    #[serde(rename = "y")]
    pub value: f64,
}
