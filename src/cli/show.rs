use std::path::PathBuf;

use clap::Parser;
use itertools::Itertools;

use crate::{
    core::{error::FetchResult, line::DataLine},
    export,
    prelude::*,
    tables::build_results_table,
};

#[derive(Parser)]
pub struct ShowArgs {
    /// JSON file saved by `fetch --output`.
    pub path: PathBuf,
}

impl ShowArgs {
    pub fn run(&self) -> Result {
        let bytes = std::fs::read(&self.path)
            .with_context(|| format!("failed to read `{}`", self.path.display()))?;
        let lines = export::from_json(&bytes)?;
        info!(n_lines = lines.len(), "loaded");
        let requests = lines.iter().map(DataLine::to_request).collect_vec();
        let results: Vec<FetchResult> = lines.into_iter().map(Ok).collect();
        println!("{}", build_results_table(&requests, &results));
        Ok(())
    }
}
