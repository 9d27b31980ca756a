//! Data models for comic sources, feed entries, and persisted run state.
//!
//! This module defines the core data structures used throughout the application:
//! - [`Source`]: A configured comic to scrape, with its site kind and flags
//! - [`Entry`]: One published feed item, immutable once appended to history
//! - [`State`]: The persisted dedup map and bounded history list
//!
//! The persisted shapes are a stable external contract: `state.json` is
//! inspected by other tooling, so field names and the `slug:date` key format
//! must not change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Maximum number of entries retained in [`State::history`].
///
/// Eviction is pure FIFO by prepend-and-truncate, not by age.
pub const HISTORY_LIMIT: usize = 90;

/// Which extraction strategy set applies to a source's pages.
///
/// Each supported site has its own mix of candidate strategies in
/// [`crate::scrapers`]; this enum selects among them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteKind {
    /// GoComics pages: scored candidates pooled from the embedded JSON
    /// payload, visible images, raw-markup scans, and social meta tags.
    GoComics,
    /// The Far Side: social meta tags and visible images, resolved against
    /// the site's own origin.
    FarSide,
}

/// A configured comic source. Static and immutable at runtime.
#[derive(Debug, Clone)]
pub struct Source {
    /// Display name used in entry titles.
    pub name: &'static str,
    /// Short identifier used in dedup keys and cache filenames.
    pub slug: &'static str,
    /// The page scraped for today's strip.
    pub page_url: &'static str,
    /// Which extraction strategy set applies.
    pub site: SiteKind,
    /// Publish a new entry even when today's image URL is unchanged.
    /// Set for sources that frequently rerun identical content.
    pub always_republish: bool,
}

impl Source {
    /// Composite key identifying one source on one calendar day.
    pub fn dedup_key(&self, date: &str) -> String {
        format!("{}:{}", self.slug, date)
    }
}

/// The comics scraped on every run, in publication order.
pub const SOURCES: &[Source] = &[
    Source {
        name: "Garfield",
        slug: "garfield",
        page_url: "https://www.gocomics.com/garfield",
        site: SiteKind::GoComics,
        always_republish: false,
    },
    Source {
        name: "Peanuts",
        slug: "peanuts",
        page_url: "https://www.gocomics.com/peanuts",
        site: SiteKind::GoComics,
        always_republish: false,
    },
    Source {
        name: "The Far Side",
        slug: "farside",
        page_url: "https://www.thefarside.com/",
        site: SiteKind::FarSide,
        always_republish: true,
    },
];

/// One published feed item.
///
/// Immutable once appended to [`State::history`]; evicted only by falling
/// out of the [`HISTORY_LIMIT`] window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// `slug:date` identifier, also the RSS guid.
    pub id: String,
    /// Display title, e.g. `Garfield — 2026-08-06`.
    pub title: String,
    /// The comic's page URL.
    pub link: String,
    /// Publication timestamp, serialized as RFC 3339.
    pub date: DateTime<Utc>,
    /// Rendered HTML body referencing the cached image, or link-only text
    /// for a source that failed this run.
    pub html: String,
}

/// Persisted run state: dedup map plus bounded history.
///
/// Read once at startup and written once after all sources are processed.
/// A missing state file deserializes to the zero value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct State {
    /// `slug:date` to the last published image URL for that day.
    pub seen: BTreeMap<String, String>,
    /// Published entries, newest first, at most [`HISTORY_LIMIT`] long.
    pub history: Vec<Entry>,
}
