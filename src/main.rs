use anyhow::Context;
use clap::Parser;
use dotenv::dotenv;
use crate::config::Config;
use crate::controller::AppState;

pub mod config;
pub mod controller;
pub mod error;
pub mod helpers;
pub mod models;
pub mod repositories;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::parse();
    let app_state = AppState::new(config).context("Error building application state")?;

    controller::serve(app_state).await
}
