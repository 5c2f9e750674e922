#![allow(clippy::doc_markdown)]
#![doc = include_str!("../README.md")]

mod api;
mod cli;
mod core;
mod dashboard;
mod prelude;
mod tables;

use clap::{Parser, crate_version};

use crate::{cli::Args, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt().without_time().compact().with_writer(std::io::stderr).init();
    info!(version = crate_version!(), "starting…");

    Args::parse().run().await?;

    info!("done!");
    Ok(())
}
