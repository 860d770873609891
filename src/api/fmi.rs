//! [Finnish Meteorological Institute](https://en.ilmatieteenlaitos.fi/open-data) weather data.

use chrono::{DateTime, Local, SecondsFormat, TimeDelta};
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

const SAFE_DAYS_PER_REQUEST: u32 = 7;
const SAFE_DAYS_PER_FORECAST_REQUEST: u32 = u32::MAX;

const FORECAST_QUERY_ID: &str = "fmi::forecast::hirlam::surface::point::multipointcoverage";
const OBSERVATION_QUERY_ID: &str = "fmi::observations::weather::multipointcoverage";

const INVALID_LOCATION_TEXT: &str =
    "No locations found for the place with the requested language!";

pub struct Api {
    base_url: Url,
}

impl Api {
    pub const fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    const fn parameter_name(data_type: DataType) -> Option<&'static str> {
        match data_type {
            DataType::Temperature => Some("t2m"),
            DataType::TemperatureForecast => Some("Temperature"),
            DataType::Wind => Some("ws_10min"),
            DataType::WindForecast => Some("WindSpeedMS"),
            DataType::Cloudiness => Some("n_man"),
            _ => None,
        }
    }

    const fn unit(data_type: DataType) -> &'static str {
        match data_type {
            DataType::Temperature | DataType::TemperatureForecast => "°C",
            DataType::Wind | DataType::WindForecast => "m/s",
            DataType::Cloudiness => "Oktas",
            _ => "",
        }
    }

    /// Parse the positions and values blocks, which are zipped by row index.
    fn parse_points(body: &str) -> Result<Vec<DataPoint>, FetchError> {
        let positions = text_between(body, "<gmlcov:positions>", "</gmlcov:positions>");
        let values = text_between(
            body,
            "<gml:doubleOrNilReasonTupleList>",
            "</gml:doubleOrNilReasonTupleList>",
        );

        let mut points = Vec::new();
        for (position, value) in positions.lines().zip(values.lines()) {
            let (position, value) = (position.trim(), value.trim());
            if position.is_empty() || value.is_empty() {
                continue;
            }

            // Latitude, longitude, and then the UNIX timestamp.
            let timestamp = position
                .split_whitespace()
                .next_back()
                .and_then(|timestamp| timestamp.parse().ok())
                .and_then(|timestamp| DateTime::from_timestamp(timestamp, 0))
                .ok_or_else(|| {
                    warn!(position, "malformed FMI position");
                    FetchError::MalformedResponse
                })?;
            let value: f64 = value.parse().map_err(|_| {
                warn!(value, "malformed FMI value");
                FetchError::MalformedResponse
            })?;
            if value.is_nan() {
                continue;
            }

            points.push(DataPoint::new(timestamp.with_timezone(&Local), value));
        }
        Ok(points)
    }
}

impl DataProvider for Api {
    fn supported_days_per_request(&self, request: &FetchRequest) -> u32 {
        if request.data_type.is_forecast() {
            SAFE_DAYS_PER_FORECAST_REQUEST
        } else {
            SAFE_DAYS_PER_REQUEST
        }
    }

    fn implemented_data_types(&self) -> Vec<DataType> {
        DataType::value_variants()
            .iter()
            .copied()
            .filter(|data_type| Self::parameter_name(*data_type).is_some())
            .collect()
    }

    fn implements(&self, data_type: DataType) -> bool {
        Self::parameter_name(data_type).is_some()
    }

    fn build_request(&self, request: &FetchRequest) -> WireRequest {
        let Some(parameter_name) = Self::parameter_name(request.data_type) else {
            panic!("{} is not implemented by FMI", request.data_type);
        };

        let mut start = request.time_span.start;
        let mut end = request.time_span.end;
        let query_id = if request.data_type.is_forecast() {
            // FMI returns NaN for the forecast history anyway.
            let now = Local::now() - TimeDelta::minutes(1);
            start = start.max(now);
            end = end.max(now);
            FORECAST_QUERY_ID
        } else {
            OBSERVATION_QUERY_ID
        };

        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("request", "getFeature")
            .append_pair("version", "2.0.0")
            .append_pair("storedquery_id", query_id)
            .append_pair("place", &request.location)
            .append_pair("starttime", &start.to_rfc3339_opts(SecondsFormat::Secs, false))
            .append_pair("endtime", &end.to_rfc3339_opts(SecondsFormat::Secs, false))
            .append_pair("parameters", parameter_name);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/xml"));

        WireRequest { url, headers }
    }

    fn parse_response(&self, response: &WireResponse, request: &FetchRequest) -> FetchResult {
        let points = Self::parse_points(&response.body)?;
        debug!(n_points = points.len(), "parsed");
        Ok(DataLine {
            provider: request.provider,
            data_type: request.data_type,
            time_span: request.time_span,
            points,
            location: request.location.clone(),
            unit: Self::unit(request.data_type).to_owned(),
        })
    }

    fn parse_error(&self, response: &WireResponse) -> Option<FetchError> {
        (response.status == StatusCode::BAD_REQUEST && response.body.contains(INVALID_LOCATION_TEXT))
            .then_some(FetchError::LocationNotSupportedByProvider)
    }
}

/// Trimmed text between the first `start` tag and the following `end` tag, or empty if absent.
fn text_between<'a>(input: &'a str, start: &str, end: &str) -> &'a str {
    let Some(start_index) = input.find(start).map(|index| index + start.len()) else {
        return "";
    };
    input[start_index..].find(end).map_or("", |length| input[start_index..start_index + length].trim())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::{
        api::transport::stub::query,
        core::{provider::Provider, span::TimeSpan},
    };

    // language=xml
    const BODY: &str = r"<wfs:FeatureCollection>
        <gmlcov:positions>
            61.25 24.03  1609459200
            61.25 24.03  1609462800
            61.25 24.03  1609466400
        </gmlcov:positions>
        <gml:rangeSet>
            <gml:DataBlock>
                <gml:doubleOrNilReasonTupleList>
                    -3.5
                    NaN
                    -4.25
                </gml:doubleOrNilReasonTupleList>
            </gml:DataBlock>
        </gml:rangeSet>
    </wfs:FeatureCollection>";

    fn api() -> Api {
        Api::new(Url::parse("https://opendata.fmi.fi/wfs").unwrap())
    }

    fn request(data_type: DataType) -> FetchRequest {
        FetchRequest::builder()
            .provider(Provider::Fmi)
            .data_type(data_type)
            .time_span(TimeSpan::new(
                Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap().into(),
                Utc.with_ymd_and_hms(2021, 1, 2, 0, 0, 0).unwrap().into(),
            ))
            .location("Lohja")
            .build()
    }

    #[test]
    fn test_implemented_data_types() {
        assert_eq!(
            api().implemented_data_types(),
            [
                DataType::Temperature,
                DataType::TemperatureForecast,
                DataType::Wind,
                DataType::WindForecast,
                DataType::Cloudiness,
            ]
        );
    }

    #[test]
    fn test_supported_days_per_request() {
        assert_eq!(api().supported_days_per_request(&request(DataType::Wind)), 7);
        assert_eq!(api().supported_days_per_request(&request(DataType::WindForecast)), u32::MAX);
    }

    #[test]
    fn test_build_observation_request() {
        let request = api().build_request(&request(DataType::Cloudiness));
        assert_eq!(query(&request, "storedquery_id").unwrap(), OBSERVATION_QUERY_ID);
        assert_eq!(query(&request, "place").unwrap(), "Lohja");
        assert_eq!(query(&request, "parameters").unwrap(), "n_man");
        let start_time = DateTime::parse_from_rfc3339(&query(&request, "starttime").unwrap()).unwrap();
        assert_eq!(start_time, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_build_forecast_request_clamps_history() {
        let before = Local::now() - TimeDelta::minutes(2);
        let request = api().build_request(&request(DataType::TemperatureForecast));
        assert_eq!(query(&request, "storedquery_id").unwrap(), FORECAST_QUERY_ID);
        let start_time = DateTime::parse_from_rfc3339(&query(&request, "starttime").unwrap()).unwrap();
        let end_time = DateTime::parse_from_rfc3339(&query(&request, "endtime").unwrap()).unwrap();
        assert!(start_time >= before);
        assert!(end_time >= start_time);
    }

    #[test]
    fn test_parse_response_skips_nan() {
        let request = request(DataType::Temperature);
        let line = api().parse_response(&WireResponse::ok(BODY), &request).unwrap();
        assert_eq!(line.location, "Lohja");
        assert_eq!(line.unit, "°C");
        assert_eq!(line.points.len(), 2);
        assert_eq!(line.points[0].timestamp, Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(line.points[1].timestamp, Utc.with_ymd_and_hms(2021, 1, 1, 2, 0, 0).unwrap());
        assert_abs_diff_eq!(line.points[1].value, -4.25);
    }

    #[test]
    fn test_parse_response_without_blocks() {
        let request = request(DataType::Wind);
        let line = api().parse_response(&WireResponse::ok("<wfs:FeatureCollection/>"), &request);
        assert!(line.unwrap().points.is_empty());
    }

    #[test]
    fn test_parse_response_malformed_value() {
        let body = BODY.replace("-4.25", "warm");
        let request = request(DataType::Temperature);
        assert_eq!(
            api().parse_response(&WireResponse::ok(body), &request),
            Err(FetchError::MalformedResponse),
        );
    }

    #[test]
    fn test_parse_error_invalid_location() {
        let body = format!("<ExceptionReport>{INVALID_LOCATION_TEXT}</ExceptionReport>");
        assert_eq!(
            api().parse_error(&WireResponse::new(StatusCode::BAD_REQUEST, body)),
            Some(FetchError::LocationNotSupportedByProvider),
        );
        assert_eq!(api().parse_error(&WireResponse::new(StatusCode::BAD_REQUEST, "nope")), None);
        assert_eq!(api().parse_error(&WireResponse::new(StatusCode::NOT_FOUND, "")), None);
    }
}
