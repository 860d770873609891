//! Keeping an already fetched data line up to date.

use chrono::{DateTime, Local, TimeDelta};
use tokio::sync::watch;

use crate::{
    api::Transport,
    core::{error::FetchError, line::DataLine, request::FetchRequest, span::TimeSpan},
    fetcher::Fetcher,
    prelude::*,
};

/// What a real-time update should do next.
#[derive(Clone, Debug, Eq, PartialEq)]
#[must_use]
pub enum Plan {
    Skip,

    /// Fetch the whole wanted span again and replace the line.
    Refetch(FetchRequest),

    /// Fetch only the tail and append strictly newer points.
    Extend(FetchRequest),
}

/// Decide how to bring the line up to `now`.
pub fn plan(
    wanted: &FetchRequest,
    line: &DataLine,
    now: DateTime<Local>,
    interval: TimeDelta,
) -> Plan {
    if wanted.time_span.end < now {
        // The wanted span does not reach the current moment, nothing new can appear in it.
        return Plan::Skip;
    }
    let Some(last_timestamp) = line.last_timestamp() else {
        return Plan::Skip;
    };
    if wanted.data_type.is_forecast() {
        return Plan::Refetch(wanted.clone());
    }
    let start = last_timestamp + TimeDelta::seconds(1);
    if now - start < interval {
        return Plan::Skip;
    }
    Plan::Extend(wanted.with_time_span(TimeSpan::new(start, now)))
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[must_use]
pub enum Update {
    Skipped,
    Replaced,
    Appended(usize),

    /// The wanted settings changed while fetching, the result was thrown away.
    Discarded,
}

/// Data line that follows the wanted request.
pub struct LiveLine {
    wanted: watch::Receiver<FetchRequest>,

    /// Request which the current line was fetched for.
    snapshot: Option<FetchRequest>,

    line: Option<DataLine>,
}

impl LiveLine {
    pub const fn new(wanted: watch::Receiver<FetchRequest>) -> Self {
        Self { wanted, snapshot: None, line: None }
    }

    #[must_use]
    pub const fn line(&self) -> Option<&DataLine> {
        self.line.as_ref()
    }

    #[instrument(skip_all, fields(now = %now))]
    pub async fn refresh<T: Transport>(
        &mut self,
        fetcher: &Fetcher<T>,
        now: DateTime<Local>,
        interval: TimeDelta,
    ) -> Result<Update, FetchError> {
        let wanted = self.wanted.borrow_and_update().clone();
        let plan = match &self.line {
            Some(line) if self.snapshot.as_ref() == Some(&wanted) => {
                plan(&wanted, line, now, interval)
            }
            _ => Plan::Refetch(wanted.clone()),
        };

        match plan {
            Plan::Skip => Ok(Update::Skipped),

            Plan::Refetch(request) => {
                let result = fetcher.fetch(&request).await;
                if self.is_stale(&wanted) {
                    return Ok(Update::Discarded);
                }
                match result {
                    Ok(line) => {
                        info!(n_points = line.points.len(), "replaced");
                        self.line = Some(line);
                        self.snapshot = Some(wanted);
                        Ok(Update::Replaced)
                    }
                    Err(error) => {
                        self.line = None;
                        self.snapshot = None;
                        Err(error)
                    }
                }
            }

            Plan::Extend(request) => {
                let result = fetcher.fetch(&request).await;
                if self.is_stale(&wanted) {
                    return Ok(Update::Discarded);
                }
                let fetched = result?;
                let n_appended =
                    self.line.as_mut().map_or(0, |line| line.extend_with_newer(&fetched.points));
                debug!(n_appended, "extended");
                Ok(Update::Appended(n_appended))
            }
        }
    }

    /// Exact comparison: a location that differs only in case counts as different settings.
    fn is_stale(&self, snapshot: &FetchRequest) -> bool {
        *self.wanted.borrow() != *snapshot
    }
}
