mod fetch;
mod show;
mod watch;

use std::time::Duration;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeDelta};
use clap::{Parser, Subcommand};
use reqwest::Url;

pub use self::{fetch::FetchArgs, show::ShowArgs, watch::WatchArgs};
use crate::{
    api::{HttpTransport, Providers, fingrid, fmi},
    core::provider::Provider,
    fetcher::Fetcher,
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[clap(flatten)]
    pub api: ApiArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List the data types that every provider implements.
    #[clap(name = "types")]
    Types,

    /// Fetch data lines and print their summary.
    #[clap(name = "fetch")]
    Fetch(Box<FetchArgs>),

    /// Print the summary of previously saved data lines.
    #[clap(name = "show")]
    Show(ShowArgs),

    /// Fetch a data line and keep it up to date.
    #[clap(name = "watch")]
    Watch(Box<WatchArgs>),
}

#[derive(Parser)]
pub struct ApiArgs {
    /// Fingrid Open Data API key, the provider is disabled without it.
    #[clap(long = "fingrid-api-key", env = "FINGRID_API_KEY", hide_env_values = true, global = true)]
    fingrid_api_key: Option<String>,

    #[clap(
        long = "fingrid-url",
        env = "FINGRID_URL",
        default_value = "https://api.fingrid.fi",
        global = true
    )]
    fingrid_url: Url,

    #[clap(
        long = "fmi-url",
        env = "FMI_URL",
        default_value = "https://opendata.fmi.fi/wfs",
        global = true
    )]
    fmi_url: Url,

    /// HTTP request timeout.
    #[clap(long, env = "HTTP_TIMEOUT", default_value = "10s", global = true)]
    timeout: humantime::Duration,
}

impl ApiArgs {
    pub fn providers(&self) -> Result<Providers> {
        let providers = Providers::default().with(Provider::Fmi, fmi::Api::new(self.fmi_url.clone()));
        let Some(api_key) = &self.fingrid_api_key else {
            warn!("Fingrid API key is not set, the provider is disabled");
            return Ok(providers);
        };
        Ok(providers.with(Provider::Fingrid, fingrid::Api::new(self.fingrid_url.clone(), api_key)?))
    }

    /// Build the fetcher and make sure that the provider is registered in it.
    pub fn fetcher_for(&self, provider: Provider) -> Result<Fetcher<HttpTransport>> {
        let timeout: Duration = self.timeout.into();
        let fetcher = Fetcher::new(HttpTransport::new(timeout)?, self.providers()?);
        ensure!(
            fetcher.provider_data_types().contains_key(&provider),
            "{provider} is not configured, check the API options",
        );
        Ok(fetcher)
    }
}

/// Parse an RFC 3339 timestamp, a local date, or a duration back from now.
pub fn parse_moment(text: &str) -> Result<DateTime<Local>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(text) {
        return Ok(timestamp.with_timezone(&Local));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return date
            .and_time(NaiveTime::MIN)
            .and_local_timezone(Local)
            .earliest()
            .with_context(|| format!("`{text}` does not exist in the local time zone"));
    }
    let ago = humantime::parse_duration(text)
        .with_context(|| format!("`{text}` is neither a timestamp, a date, nor a duration"))?;
    Ok(Local::now() - TimeDelta::from_std(ago)?)
}
