#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod export;
mod fetcher;
mod prelude;
mod realtime;
mod tables;

use clap::{Parser, crate_version};

use crate::{
    cli::{Args, Command},
    prelude::*,
    tables::build_data_types_table,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().init();
    info!(version = crate_version!(), "starting…");

    let args = Args::parse();

    match args.command {
        Command::Types => {
            println!("{}", build_data_types_table(&args.api.providers()?.data_types()));
        }
        Command::Fetch(fetch_args) => {
            fetch_args.run(&args.api).await?;
        }
        Command::Show(show_args) => {
            show_args.run()?;
        }
        Command::Watch(watch_args) => {
            watch_args.run(&args.api).await?;
        }
    }

    info!("done!");
    Ok(())
}
