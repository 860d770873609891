use bon::Builder;

use crate::core::{data_type::DataType, provider::Provider, span::TimeSpan};

/// Everything needed to fetch one data line, without any knowledge of URLs.
#[derive(Clone, Debug, Hash, Eq, PartialEq, Builder)]
#[must_use]
pub struct FetchRequest {
    pub provider: Provider,
    pub data_type: DataType,
    pub time_span: TimeSpan,

    /// Ignored by providers whose data types are location-independent.
    #[builder(into, default)]
    pub location: String,
}

impl FetchRequest {
    pub fn with_time_span(&self, time_span: TimeSpan) -> Self {
        Self { time_span, ..self.clone() }
    }
}
