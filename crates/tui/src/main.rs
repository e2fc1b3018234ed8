mod app;
mod client;
mod config;
mod error;
mod local_state;
mod ui;

use std::{
    fs::{self, File, OpenOptions},
    path::Path,
    sync::Mutex,
};

use crate::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let config = config::load()?;

    // The terminal belongs to the UI, so logs go to a file.
    let log_file = open_log_file(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "quotedesk_tui={level},engine={level}",
            level = config.log_level
        ))
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .init();
    tracing::info!(base_url = %config.base_url, "starting quotedesk");

    let mut app = app::App::new(config)?;
    app.run().await?;
    Ok(())
}

fn open_log_file(path: &str) -> Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}
