/// Every series kind that any provider can deliver.
///
/// Display names double as persistent keys in exported files, so do not edit them.
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
pub enum DataType {
    #[display("Electricity consumption")]
    #[serde(rename = "Electricity consumption")]
    ElectricityConsumption,

    #[display("Electricity consumption forecast (24h)")]
    #[serde(rename = "Electricity consumption forecast (24h)")]
    ElectricityConsumptionForecast,

    #[display("Electricity production")]
    #[serde(rename = "Electricity production")]
    ElectricityProduction,

    #[display("Electricity production prediction (24h)")]
    #[serde(rename = "Electricity production prediction (24h)")]
    ElectricityProductionForecast,

    #[display("Hydro power production")]
    #[serde(rename = "Hydro power production")]
    HydroPowerProduction,

    #[display("Nuclear power production")]
    #[serde(rename = "Nuclear power production")]
    NuclearPowerProduction,

    #[display("Wind power production")]
    #[serde(rename = "Wind power production")]
    WindPowerProduction,

    #[display("Temperature")]
    #[serde(rename = "Temperature")]
    Temperature,

    #[display("Temperature forecast")]
    #[serde(rename = "Temperature forecast")]
    TemperatureForecast,

    #[display("Observed wind")]
    #[serde(rename = "Observed wind")]
    Wind,

    #[display("Wind forecast")]
    #[serde(rename = "Wind forecast")]
    WindForecast,

    #[display("Observed cloudiness")]
    #[serde(rename = "Observed cloudiness")]
    Cloudiness,
}

impl DataType {
    /// Forecasts revise already returned values, so they cannot be extended incrementally.
    #[must_use]
    pub const fn is_forecast(self) -> bool {
        matches!(
            self,
            Self::ElectricityConsumptionForecast
                | Self::ElectricityProductionForecast
                | Self::TemperatureForecast
                | Self::WindForecast
        )
    }

    /// Individual power sources that together make up the production.
    #[must_use]
    pub const fn is_production_source(self) -> bool {
        matches!(
            self,
            Self::HydroPowerProduction | Self::NuclearPowerProduction | Self::WindPowerProduction
        )
    }
}
