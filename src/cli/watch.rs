use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta};
use clap::Parser;
use tokio::{
    sync::watch,
    time::{MissedTickBehavior, interval},
};

use crate::{
    cli::{ApiArgs, parse_moment},
    core::{data_type::DataType, provider::Provider, request::FetchRequest, span::TimeSpan},
    prelude::*,
    realtime::{LiveLine, Update},
};

#[derive(Parser)]
pub struct WatchArgs {
    #[clap(long, env = "PROVIDER")]
    pub provider: Provider,

    #[clap(long = "data-type")]
    pub data_type: DataType,

    /// Start of the time span: RFC 3339 timestamp, local date, or how long ago.
    #[clap(long, value_parser = parse_moment)]
    pub since: DateTime<Local>,

    /// Stop watching after this moment, defaults to one day from now.
    #[clap(long, value_parser = parse_moment)]
    pub until: Option<DateTime<Local>>,

    #[clap(long, env = "LOCATION", default_value = "")]
    pub location: String,

    #[clap(long, env = "WATCH_INTERVAL", default_value = "2min")]
    pub interval: humantime::Duration,
}

impl WatchArgs {
    #[instrument(skip_all, fields(provider = %self.provider, data_type = %self.data_type))]
    pub async fn run(&self, api: &ApiArgs) -> Result {
        let until = self.until.unwrap_or_else(|| Local::now() + TimeDelta::days(1));
        ensure!(self.since <= until, "the time span starts after it ends");

        let fetcher = api.fetcher_for(self.provider)?;
        let (_sender, receiver) = watch::channel(
            FetchRequest::builder()
                .provider(self.provider)
                .data_type(self.data_type)
                .time_span(TimeSpan::new(self.since, until))
                .location(self.location.clone())
                .build(),
        );
        let mut live_line = LiveLine::new(receiver);

        let period: Duration = self.interval.into();
        let min_extension = TimeDelta::from_std(period)?;
        let mut interval = interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            interval.tick().await;
            let now = Local::now();

            match live_line.refresh(&fetcher, now, min_extension).await {
                Ok(Update::Appended(n_appended)) if n_appended != 0 => {
                    if let Some(line) = live_line.line() {
                        for point in &line.points[line.points.len() - n_appended..] {
                            info!(
                                timestamp = %point.timestamp,
                                value = point.value,
                                unit = %line.unit,
                                "new point",
                            );
                        }
                    }
                }
                Ok(Update::Replaced) => {
                    if let Some(line) = live_line.line()
                        && let Some(point) = line.points.last()
                    {
                        info!(
                            n_points = line.points.len(),
                            timestamp = %point.timestamp,
                            value = point.value,
                            unit = %line.unit,
                            "latest point",
                        );
                    }
                }
                Ok(update) => {
                    debug!(?update, "nothing new");
                }
                Err(error) => {
                    warn!("failed to refresh: {error:#}");
                }
            }

            if now > until {
                info!("the time span is over");
                break Ok(());
            }
        }
    }
}
