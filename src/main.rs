//! # Comics Feed
//!
//! A personal content-aggregation tool that scrapes a small set of webcomic
//! pages, extracts the current strip image through a layered set of
//! heuristics, caches the images locally, and republishes an RSS feed of
//! recent strips.
//!
//! ## Usage
//!
//! ```sh
//! comics_feed --pages-base-url https://me.github.io/comics
//! ```
//!
//! ## Architecture
//!
//! Each run is one sequential pass:
//! 1. **Load**: Read the persisted dedup map and entry history
//! 2. **Scrape**: For every configured comic, fetch its page, pick the best
//!    strip-image candidate, and cache the image (a failing source degrades
//!    to a link-only entry rather than aborting the run)
//! 3. **Publish**: Prepend new entries, truncate the history window, and
//!    regenerate the RSS document
//! 4. **Save**: Overwrite the state file once, at the end

use chrono::Utc;
use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cache;
mod cli;
mod http;
mod models;
mod normalize;
mod outputs;
mod pipeline;
mod scrapers;
mod state;
mod utils;

use cli::Cli;
use http::HttpFetcher;
use models::SOURCES;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("comics_feed starting up");

    // Parse CLI
    let args = Cli::parse();
    debug!(?args.output_dir, ?args.state_file, "Parsed CLI arguments");

    let public_base = args.public_base_url()?;
    info!(%public_base, "Publishing under base URL");

    // Early check: ensure the output dir is writable before any network work
    if let Err(e) = ensure_writable_dir(&args.output_dir).await {
        error!(
            path = %args.output_dir,
            error = %e,
            "Output directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let output_dir = Path::new(&args.output_dir);
    let images_dir = output_dir.join(cache::IMAGES_SEGMENT);
    let state_path = Path::new(&args.state_file);

    // ---- Load state, process sources, publish ----
    let mut state = state::load(state_path).await?;
    let now = Utc::now();

    let fetcher = HttpFetcher;
    let added = pipeline::run(&fetcher, SOURCES, &mut state, now, &images_dir, &public_base).await;

    outputs::feed::write_feed(output_dir, &state.history).await?;
    state::save(state_path, &state).await?;

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        added,
        history = state.history.len(),
        "Execution complete"
    );

    Ok(())
}
