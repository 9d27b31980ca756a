//! Persisted state file handling.
//!
//! The state document is read once when a run starts and written once
//! after every source has been processed, so a crash mid-run leaves the
//! previous file intact. There is no locking: the execution model is a
//! scheduled, non-overlapping single invocation.

use crate::models::State;
use std::error::Error;
use std::io::ErrorKind;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Load state from `path`.
///
/// A missing file yields the zero value. A present but malformed file is
/// an error: a corrupt state document is a fatal condition for the run,
/// caught here at deserialization rather than at point of use.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load(path: &Path) -> Result<State, Box<dyn Error>> {
    match fs::read_to_string(path).await {
        Ok(text) => {
            let state: State = serde_json::from_str(&text)?;
            info!(
                seen = state.seen.len(),
                history = state.history.len(),
                "Loaded state"
            );
            Ok(state)
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No state file yet; starting empty");
            Ok(State::default())
        }
        Err(e) => Err(Box::new(e)),
    }
}

/// Serialize and overwrite the state file.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn save(path: &Path, state: &State) -> Result<(), Box<dyn Error>> {
    let json = serde_json::to_string_pretty(state)?;
    fs::write(path, json).await?;
    info!(
        seen = state.seen.len(),
        history = state.history.len(),
        "Wrote state"
    );
    Ok(())
}
