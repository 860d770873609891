use average::{Max, Mean, Min};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::core::{
    data_type::DataType,
    point::DataPoint,
    provider::Provider,
    request::FetchRequest,
    span::TimeSpan,
};

/// Normalized time series together with what it is and where it came from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataLine {
    pub provider: Provider,

    #[serde(rename = "datatype")]
    pub data_type: DataType,

    #[serde(rename = "timespan")]
    pub time_span: TimeSpan,

    /// Ordered by timestamp.
    #[serde(rename = "datapoints")]
    pub points: Vec<DataPoint>,

    pub location: String,

    #[serde(rename = "yunit")]
    pub unit: String,
}

impl DataLine {
    /// Same metadata, no points.
    #[must_use]
    pub fn empty_like(&self) -> Self {
        Self {
            provider: self.provider,
            data_type: self.data_type,
            time_span: self.time_span,
            points: Vec::new(),
            location: self.location.clone(),
            unit: self.unit.clone(),
        }
    }

    /// Request that would fetch this line again.
    pub fn to_request(&self) -> FetchRequest {
        FetchRequest::builder()
            .provider(self.provider)
            .data_type(self.data_type)
            .time_span(self.time_span)
            .location(self.location.clone())
            .build()
    }

    #[must_use]
    pub fn last_timestamp(&self) -> Option<DateTime<Local>> {
        self.points.last().map(|point| point.timestamp)
    }

    /// Suffix of the candidates that is strictly newer than the last point of this line.
    #[must_use]
    pub fn find_new_points<'a>(&self, candidates: &'a [DataPoint]) -> &'a [DataPoint] {
        let Some(last_timestamp) = self.last_timestamp() else {
            return candidates;
        };
        let start = candidates
            .iter()
            .position(|point| point.timestamp > last_timestamp)
            .unwrap_or(candidates.len());
        &candidates[start..]
    }

    /// Append the candidates that are strictly newer than the current tail.
    ///
    /// Returns the number of appended points.
    pub fn append_newer(&mut self, candidates: &[DataPoint]) -> usize {
        let new_points = self.find_new_points(candidates);
        self.points.extend_from_slice(new_points);
        new_points.len()
    }

    /// Append the newer candidates and move the end of the span to the new tail.
    pub fn extend_with_newer(&mut self, candidates: &[DataPoint]) -> usize {
        let n_appended = self.append_newer(candidates);
        if n_appended != 0
            && let Some(last_timestamp) = self.last_timestamp()
        {
            self.time_span.end = last_timestamp;
        }
        n_appended
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.value)
    }

    #[must_use]
    pub fn sum(&self) -> f64 {
        self.values().sum()
    }

    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        let estimate: Mean = self.values().collect();
        if estimate.is_empty() { None } else { Some(estimate.mean()) }
    }

    #[must_use]
    pub fn min(&self) -> Option<f64> {
        (!self.points.is_empty()).then(|| self.values().collect::<Min>().min())
    }

    #[must_use]
    pub fn max(&self) -> Option<f64> {
        (!self.points.is_empty()).then(|| self.values().collect::<Max>().max())
    }
}

#[cfg(test)]
pub mod tests {
    use approx::assert_abs_diff_eq;
    use chrono::{TimeDelta, TimeZone};

    use super::*;

    pub fn at(hour: i64) -> DateTime<Local> {
        Local.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap() + TimeDelta::hours(hour)
    }

    pub fn line(hours: &[i64]) -> DataLine {
        let start = hours.first().copied().unwrap_or_default();
        let end = hours.last().copied().unwrap_or_default();
        DataLine {
            provider: Provider::Fingrid,
            data_type: DataType::ElectricityConsumption,
            time_span: TimeSpan::new(at(start), at(end)),
            points: hours.iter().map(|hour| DataPoint::new(at(*hour), *hour as f64)).collect(),
            location: String::new(),
            unit: "MW".to_owned(),
        }
    }

    fn hours(points: &[DataPoint]) -> Vec<DateTime<Local>> {
        points.iter().map(|point| point.timestamp).collect()
    }

    #[test]
    fn test_find_new_points_suffix() {
        let original = line(&[0, 1, 2]);
        let candidates = line(&[1, 2, 3, 4]).points;
        assert_eq!(hours(original.find_new_points(&candidates)), [at(3), at(4)]);
    }

    #[test]
    fn test_find_new_points_nothing_newer() {
        let original = line(&[0, 1, 2]);
        let candidates = line(&[0, 1, 2]).points;
        assert!(original.find_new_points(&candidates).is_empty());
    }

    #[test]
    fn test_find_new_points_empty_original() {
        let original = line(&[]);
        let candidates = line(&[5, 6]).points;
        assert_eq!(original.find_new_points(&candidates), candidates.as_slice());
    }

    #[test]
    fn test_extend_with_newer_moves_end() {
        let mut original = line(&[0, 1, 2]);
        assert_eq!(original.extend_with_newer(&line(&[2, 3, 4]).points), 2);
        assert_eq!(hours(&original.points), [at(0), at(1), at(2), at(3), at(4)]);
        assert_eq!(original.time_span.end, at(4));
    }

    #[test]
    fn test_extend_with_newer_keeps_end_when_nothing_appended() {
        let mut original = line(&[0, 1, 2]);
        original.time_span.end = at(10);
        assert_eq!(original.extend_with_newer(&line(&[1]).points), 0);
        assert_eq!(original.time_span.end, at(10));
    }

    #[test]
    fn test_to_request() {
        let line = DataLine { location: "Lohja".to_owned(), ..line(&[1, 2]) };
        let request = line.to_request();
        assert_eq!(request.time_span, TimeSpan::new(at(1), at(2)));
        assert_eq!(request.location, "Lohja");
    }

    #[test]
    fn test_statistics() {
        let line = line(&[1, 2, 6]);
        assert_abs_diff_eq!(line.sum(), 9.0);
        assert_abs_diff_eq!(line.mean().unwrap(), 3.0);
        assert_abs_diff_eq!(line.min().unwrap(), 1.0);
        assert_abs_diff_eq!(line.max().unwrap(), 6.0);
    }

    #[test]
    fn test_statistics_empty() {
        let line = line(&[]);
        assert_abs_diff_eq!(line.sum(), 0.0);
        assert!(line.mean().is_none());
        assert!(line.min().is_none());
        assert!(line.max().is_none());
    }

    #[test]
    fn test_statistics_below_zero() {
        let line = DataLine {
            points: vec![DataPoint::new(at(0), -4.5), DataPoint::new(at(1), -0.5)],
            ..line(&[0, 1])
        };
        assert_abs_diff_eq!(line.mean().unwrap(), -2.5);
        assert_abs_diff_eq!(line.min().unwrap(), -4.5);
        assert_abs_diff_eq!(line.max().unwrap(), -0.5);
    }
}
