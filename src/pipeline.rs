//! Per-source processing and history maintenance.
//!
//! The run loop visits every configured source in order, one at a time,
//! and collects a result per source rather than letting a failure
//! interrupt control flow. A source that fails for any reason (transport,
//! extraction, cache write) degrades to a link-only entry and the run
//! continues; only state and feed persistence outside this loop are fatal.

use crate::cache::cache_image;
use crate::http::Fetch;
use crate::models::{Entry, HISTORY_LIMIT, Source, State};
use crate::scrapers::find_strip_image;
use chrono::{DateTime, Utc};
use std::error::Error;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Process every source sequentially and fold the results into `state`.
///
/// New entries are prepended to the history in source-configured order and
/// the history is truncated to [`HISTORY_LIMIT`]. Returns the number of
/// entries added this run.
#[instrument(level = "info", skip_all)]
pub async fn run(
    fetcher: &impl Fetch,
    sources: &[Source],
    state: &mut State,
    now: DateTime<Utc>,
    images_dir: &Path,
    public_base: &str,
) -> usize {
    let today = now.format("%Y-%m-%d").to_string();

    let mut new_entries = Vec::new();
    for source in sources {
        match process_source(fetcher, source, state, &today, now, images_dir, public_base).await {
            Ok(Some(entry)) => {
                info!(source = source.slug, id = %entry.id, "Publishing entry");
                new_entries.push(entry);
            }
            Ok(None) => {
                debug!(source = source.slug, "Unchanged since last run; skipping");
            }
            Err(e) => {
                // One source must never abort the run.
                warn!(source = source.slug, error = %e, "Source failed; publishing link-only entry");
                new_entries.push(fallback_entry(source, &today, now));
            }
        }
    }

    let added = new_entries.len();
    new_entries.extend(state.history.drain(..));
    state.history = new_entries;
    state.history.truncate(HISTORY_LIMIT);
    added
}

/// One source's full step: fetch, extract, dedup, cache, build the entry.
///
/// `Ok(None)` means today's strip is unchanged and the source was skipped.
/// Any error is handled by the caller's failure isolation.
async fn process_source(
    fetcher: &impl Fetch,
    source: &Source,
    state: &mut State,
    today: &str,
    now: DateTime<Utc>,
    images_dir: &Path,
    public_base: &str,
) -> Result<Option<Entry>, Box<dyn Error>> {
    let html = fetcher.get_text(source.page_url).await?;
    let image_url = find_strip_image(source.site, &html)?;

    let key = source.dedup_key(today);
    if !source.always_republish && state.seen.get(&key) == Some(&image_url) {
        return Ok(None);
    }

    let public_url =
        cache_image(fetcher, &image_url, source.slug, today, images_dir, public_base).await?;
    state.seen.insert(key.clone(), image_url);

    Ok(Some(Entry {
        id: key,
        title: format!("{} — {}", source.name, today),
        link: source.page_url.to_string(),
        date: now,
        html: format!(r#"<img src="{public_url}" />"#),
    }))
}

/// Link-only entry for a source that failed this run, so the failure is
/// visible in the feed instead of the day silently missing.
fn fallback_entry(source: &Source, today: &str, now: DateTime<Utc>) -> Entry {
    Entry {
        id: source.dedup_key(today),
        title: format!("{} — {}", source.name, today),
        link: source.page_url.to_string(),
        date: now,
        html: format!(
            r#"<p>No strip image could be fetched today. <a href="{}">Read {} on the site.</a></p>"#,
            source.page_url, source.name
        ),
    }
}
