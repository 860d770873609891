use std::fmt::{Debug, Formatter};

use chrono::{DateTime, Days, Local, TimeDelta, TimeZone};

#[derive(Copy, Clone, Hash, Eq, PartialEq, serde::Serialize, serde::Deserialize)]
#[must_use]
pub struct TimeSpan {
    pub start: DateTime<Local>,
    pub end: DateTime<Local>,
}

impl Debug for TimeSpan {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}..{:?}", self.start, self.end)
    }
}

impl TimeSpan {
    pub fn new(start: DateTime<Local>, end: DateTime<Local>) -> Self {
        assert!(start <= end, "time span starts after it ends: {start:?}..{end:?}");
        Self { start, end }
    }

    /// Number of calendar days between the start and end dates.
    #[must_use]
    pub fn days(self) -> i64 {
        (self.end.date_naive() - self.start.date_naive()).num_days()
    }

    /// Smallest span that covers both spans.
    pub fn union(self, other: Self) -> Self {
        Self { start: self.start.min(other.start), end: self.end.max(other.end) }
    }

    /// Split the span into consecutive parts of `max_days` each, the last one clipped to the end.
    pub fn split(self, max_days: u32) -> Vec<Self> {
        split_days(&self.start, &self.end, max_days)
            .into_iter()
            .map(|(start, end)| Self { start, end })
            .collect()
    }
}

fn split_days<Tz: TimeZone>(
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
    max_days: u32,
) -> Vec<(DateTime<Tz>, DateTime<Tz>)> {
    assert!(max_days > 0, "cannot split into zero-day parts");

    let mut parts = Vec::new();
    let mut part_start = start.clone();
    loop {
        let part_end = add_days(&part_start, max_days)
            .map_or_else(|| end.clone(), |part_end| part_end.min(end.clone()));
        parts.push((part_start, part_end.clone()));
        if part_end >= *end {
            break parts;
        }
        part_start = part_end;
    }
}

/// Same wall-clock time `days` later.
///
/// When that local time is skipped by a DST transition, steps by whole 24-hour days instead.
/// Returns [`None`] only past the representable range.
fn add_days<Tz: TimeZone>(moment: &DateTime<Tz>, days: u32) -> Option<DateTime<Tz>> {
    let local = moment.naive_local().checked_add_days(Days::new(u64::from(days)))?;
    local.and_local_timezone(moment.timezone()).earliest().or_else(|| {
        moment.clone().checked_add_signed(TimeDelta::try_days(i64::from(days))?)
    })
}
