#[derive(
    Copy,
    Clone,
    Debug,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    clap::ValueEnum,
    derive_more::Display,
    serde::Serialize,
    serde::Deserialize,
)]
pub enum Provider {
    /// [Fingrid](https://data.fingrid.fi) electricity statistics.
    #[display("Fingrid")]
    #[serde(rename = "Fingrid")]
    Fingrid,

    /// [Finnish Meteorological Institute](https://en.ilmatieteenlaitos.fi/open-data) weather data.
    #[display("FMI")]
    #[serde(rename = "FMI")]
    Fmi,
}
