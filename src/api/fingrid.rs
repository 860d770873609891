//! [Fingrid](https://data.fingrid.fi) electricity statistics.

use chrono::{DateTime, Local, SecondsFormat};
use clap::ValueEnum;
use http::{HeaderMap, HeaderValue, StatusCode, header::CONTENT_TYPE};
use reqwest::Url;

use crate::{
    api::{
        provider::DataProvider,
        transport::{WireRequest, WireResponse},
    },
    core::{
        data_type::DataType,
        error::{FetchError, FetchResult},
        line::DataLine,
        point::DataPoint,
        request::FetchRequest,
    },
    prelude::*,
};

const SAFE_DAYS_PER_REAL_TIME_REQUEST: u32 = 4 * 30;
const SAFE_DAYS_PER_OTHER_REQUEST: u32 = 4 * 365;
const UNIT: &str = "MW";

pub struct Api {
    base_url: Url,
    api_key: HeaderValue,
}

impl Api {
    pub fn new(base_url: Url, api_key: &str) -> Result<Self> {
        let mut api_key = HeaderValue::from_str(api_key).context("invalid Fingrid API key")?;
        api_key.set_sensitive(true);
        Ok(Self { base_url, api_key })
    }

    const fn variable_id(data_type: DataType) -> Option<u16> {
        match data_type {
            DataType::ElectricityConsumption => Some(193),
            DataType::ElectricityConsumptionForecast => Some(165),
            DataType::ElectricityProduction => Some(192),
            DataType::ElectricityProductionForecast => Some(242),
            DataType::HydroPowerProduction => Some(191),
            DataType::NuclearPowerProduction => Some(188),
            DataType::WindPowerProduction => Some(181),
            _ => None,
        }
    }

    const fn is_real_time(data_type: DataType) -> bool {
        matches!(
            data_type,
            DataType::ElectricityConsumption
                | DataType::ElectricityProduction
                | DataType::HydroPowerProduction
                | DataType::NuclearPowerProduction
                | DataType::WindPowerProduction
        )
    }

    /// Parse a `start_time,end_time,value` row.
    fn parse_row(row: &str) -> Option<DataPoint> {
        let mut items = row.split(',');
        let timestamp = parse_timestamp(items.next()?.trim())?;
        let value = items.nth(1)?.trim().parse().ok()?;
        Some(DataPoint::new(timestamp, value))
    }
}

impl DataProvider for Api {
    fn supported_days_per_request(&self, request: &FetchRequest) -> u32 {
        if Self::is_real_time(request.data_type) {
            SAFE_DAYS_PER_REAL_TIME_REQUEST
        } else {
            SAFE_DAYS_PER_OTHER_REQUEST
        }
    }

    fn implemented_data_types(&self) -> Vec<DataType> {
        DataType::value_variants()
            .iter()
            .copied()
            .filter(|data_type| Self::variable_id(*data_type).is_some())
            .collect()
    }

    fn implements(&self, data_type: DataType) -> bool {
        Self::variable_id(data_type).is_some()
    }

    fn build_request(&self, request: &FetchRequest) -> WireRequest {
        let Some(variable_id) = Self::variable_id(request.data_type) else {
            panic!("{} is not implemented by Fingrid", request.data_type);
        };

        let mut url = self.base_url.clone();
        url.set_path(&format!("/v1/variable/{variable_id}/events/csv"));
        url.query_pairs_mut()
            .append_pair(
                "start_time",
                &request.time_span.start.to_rfc3339_opts(SecondsFormat::Secs, false),
            )
            .append_pair("end_time", &request.time_span.end.to_rfc3339_opts(SecondsFormat::Secs, false));

        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", self.api_key.clone());
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/csv"));

        WireRequest { url, headers }
    }

    fn parse_response(&self, response: &WireResponse, request: &FetchRequest) -> FetchResult {
        let points = response
            .body
            .lines()
            .skip(1) // headers
            .filter(|row| !row.trim().is_empty())
            .map(|row| {
                Self::parse_row(row).ok_or_else(|| {
                    warn!(row, "malformed Fingrid row");
                    FetchError::MalformedResponse
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        debug!(n_points = points.len(), "parsed");
        Ok(DataLine {
            provider: request.provider,
            data_type: request.data_type,
            time_span: request.time_span,
            points,
            location: String::new(),
            unit: UNIT.to_owned(),
        })
    }

    fn parse_error(&self, response: &WireResponse) -> Option<FetchError> {
        match response.status {
            StatusCode::NOT_FOUND => Some(FetchError::TypeNotImplementedByProvider),
            StatusCode::RANGE_NOT_SATISFIABLE => Some(FetchError::TooLargeTimeSpan),
            StatusCode::SERVICE_UNAVAILABLE => Some(FetchError::ServerMaintenance),
            _ => None,
        }
    }
}

/// Fingrid sends ISO 8601 timestamps, with or without a colon in the offset.
fn parse_timestamp(text: &str) -> Option<DateTime<Local>> {
    DateTime::parse_from_rfc3339(text)
        .or_else(|_| DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f%z"))
        .ok()
        .map(|timestamp| timestamp.with_timezone(&Local))
}
