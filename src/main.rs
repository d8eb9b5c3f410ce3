mod analysis;
mod app;
mod chat;
mod commands;
mod config;
mod error;
mod logging;
mod questions;
mod recording;
mod session;
mod setup;
mod transcription;
mod ui;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    app::run().await
}
