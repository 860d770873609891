use std::path::PathBuf;

use chrono::{DateTime, Local};
use clap::Parser;
use itertools::Itertools;

use crate::{
    cli::{ApiArgs, parse_moment},
    core::{data_type::DataType, provider::Provider, request::FetchRequest, span::TimeSpan},
    export,
    prelude::*,
    tables::build_results_table,
};

#[derive(Parser)]
pub struct FetchArgs {
    #[clap(long, env = "PROVIDER")]
    pub provider: Provider,

    #[clap(long = "data-type", value_delimiter = ',', num_args = 1.., required = true)]
    pub data_types: Vec<DataType>,

    /// Start of the time span: RFC 3339 timestamp, local date, or how long ago.
    #[clap(long, value_parser = parse_moment)]
    pub since: DateTime<Local>,

    /// End of the time span, defaults to now.
    #[clap(long, value_parser = parse_moment)]
    pub until: Option<DateTime<Local>>,

    /// Weather station place name, ignored by electricity statistics.
    #[clap(long, env = "LOCATION", default_value = "")]
    pub location: String,

    /// Save the fetched lines as JSON.
    #[clap(long)]
    pub output: Option<PathBuf>,
}

impl FetchArgs {
    #[instrument(skip_all, fields(provider = %self.provider))]
    pub async fn run(&self, api: &ApiArgs) -> Result {
        let until = self.until.unwrap_or_else(Local::now);
        ensure!(self.since <= until, "the time span starts after it ends");
        let time_span = TimeSpan::new(self.since, until);

        let fetcher = api.fetcher_for(self.provider)?;
        let requests = self
            .data_types
            .iter()
            .map(|data_type| {
                FetchRequest::builder()
                    .provider(self.provider)
                    .data_type(*data_type)
                    .time_span(time_span)
                    .location(self.location.clone())
                    .build()
            })
            .collect_vec();
        let results = fetcher.fetch_all(&requests).await;
        info!(n_failed = results.iter().filter(|result| result.is_err()).count(), "fetched");
        println!("{}", build_results_table(&requests, &results));

        if let Some(path) = &self.output {
            let lines = results.into_iter().filter_map(Result::ok).collect_vec();
            std::fs::write(path, export::to_json(&lines)?)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            info!(path = %path.display(), n_lines = lines.len(), "saved");
        }
        Ok(())
    }
}
