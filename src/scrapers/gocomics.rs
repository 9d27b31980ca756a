//! GoComics strip-image extraction.
//!
//! GoComics pages are a JavaScript-heavy app, so the strip URL can show up
//! in several places: the embedded `__NEXT_DATA__` JSON payload, plain
//! `<img>` elements, string-escaped URLs inside inline scripts, and the
//! social meta tags. The social tags frequently point at a promotional
//! crop rather than the strip itself, so every candidate is scored by host
//! specificity and share-card crops are excluded outright.
//!
//! # Candidate Ranking
//!
//! | Candidate | Treatment |
//! |-----------|-----------|
//! | `featureassets.gocomics.com` (strip CDN) | score 100 |
//! | `gocomicscmsassets.gocomics.com` (CMS assets) | score 60 |
//! | any other host | score 10 |
//! | `width=2800` query marker (largest rendition) | +5 bonus |
//! | filename containing `GC_Social` (share crop) | excluded, never ranked |

use crate::normalize::normalize_url;
use crate::scrapers::{Candidate, Strategy, pick_best};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

const ORIGIN: &str = "https://www.gocomics.com";

/// Direct strip-asset CDN, the highest-fidelity host.
const STRIP_CDN_HOST: &str = "featureassets.gocomics.com";

/// Generic CMS asset host; real strips occasionally live here too.
const CMS_ASSET_HOST: &str = "gocomicscmsassets.gocomics.com";

/// Filename marker on social-share crops.
const SOCIAL_CARD_MARKER: &str = "GC_Social";

/// Query marker for the largest supported rendition.
const MAX_WIDTH_MARKER: &str = "width=2800";

/// Matches asset-host URLs in raw markup, tolerating `\/` escaping inside
/// inline scripts.
static ASSET_URL_RE: Lazy<Regex> = Lazy::new(|| {
    // A backslash is only part of a URL as the `\/` escape pair, so it is
    // matched in the alternation rather than the character class.
    Regex::new(
        r#"https:(?:\\/\\/|//)(?:featureassets|gocomicscmsassets)\.gocomics\.com(?:\\/|/|[A-Za-z0-9_\-.%?=&;])+"#,
    )
    .unwrap()
});

fn score_url(url: &str) -> i32 {
    let mut score = if url.contains(STRIP_CDN_HOST) {
        100
    } else if url.contains(CMS_ASSET_HOST) {
        60
    } else {
        10
    };
    if url.contains(MAX_WIDTH_MARKER) {
        score += 5;
    }
    score
}

fn is_social_card(url: &str) -> bool {
    url.contains(SOCIAL_CARD_MARKER)
}

/// Normalize, exclude, and score one raw candidate string.
fn candidate(raw: &str) -> Option<Candidate> {
    let url = normalize_url(raw, ORIGIN);
    if is_social_card(&url) {
        return None;
    }
    let score = score_url(&url);
    Some(Candidate { url, score })
}

/// Walks every string leaf of the embedded `__NEXT_DATA__` JSON payload
/// and collects the ones that look like absolute URLs.
struct NextDataPayload;

impl Strategy for NextDataPayload {
    fn extract(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("script#__NEXT_DATA__").unwrap();

        let mut found = Vec::new();
        for element in document.select(&selector) {
            let text = element.text().collect::<String>();
            if let Ok(payload) = serde_json::from_str::<Value>(&text) {
                collect_url_leaves(&payload, &mut found);
            }
        }
        found.iter().filter_map(|raw| candidate(raw)).collect()
    }
}

fn collect_url_leaves(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) if s.starts_with("https://") || s.starts_with("http://") => {
            out.push(s.clone());
        }
        Value::Array(items) => {
            for item in items {
                collect_url_leaves(item, out);
            }
        }
        Value::Object(map) => {
            for item in map.values() {
                collect_url_leaves(item, out);
            }
        }
        _ => {}
    }
}

/// Collects the `src` of every visible image element.
struct VisibleImages;

impl Strategy for VisibleImages {
    fn extract(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("img[src]").unwrap();
        document
            .select(&selector)
            .filter_map(|element| element.value().attr("src"))
            .filter_map(candidate)
            .collect()
    }
}

/// Regex scan of the raw markup for known asset-host URL shapes.
///
/// Recovers URLs that sit string-escaped inside inline scripts, where the
/// surrounding content is not parseable as clean JSON.
struct RawMarkupScan;

impl Strategy for RawMarkupScan {
    fn extract(&self, html: &str) -> Vec<Candidate> {
        ASSET_URL_RE
            .find_iter(html)
            .filter_map(|m| candidate(m.as_str()))
            .collect()
    }
}

/// Social meta tags, last resort since these frequently point at decoys.
struct SocialMeta;

const META_IMAGE_KEYS: &[&str] = &[
    "og:image",
    "og:image:secure_url",
    "twitter:image",
    "twitter:image:src",
];

impl Strategy for SocialMeta {
    fn extract(&self, html: &str) -> Vec<Candidate> {
        let document = Html::parse_document(html);
        let selector = Selector::parse("meta").unwrap();
        document
            .select(&selector)
            .filter(|element| {
                element
                    .value()
                    .attr("property")
                    .or_else(|| element.value().attr("name"))
                    .map(|key| META_IMAGE_KEYS.contains(&key))
                    .unwrap_or(false)
            })
            .filter_map(|element| element.value().attr("content"))
            .filter_map(candidate)
            .collect()
    }
}

/// Extract the best strip-image URL from a GoComics page.
///
/// Candidates from all strategies are pooled in precedence order and the
/// highest score wins, so a permissive strategy can never promote a decoy
/// over a strip-CDN URL found elsewhere.
pub fn strip_image_url(html: &str) -> Option<String> {
    let strategies: [&dyn Strategy; 4] =
        [&NextDataPayload, &VisibleImages, &RawMarkupScan, &SocialMeta];

    let mut pool = Vec::new();
    for strategy in strategies {
        pool.extend(strategy.extract(html));
    }
    debug!(candidates = pool.len(), "Pooled GoComics candidates");
    pick_best(pool)
}
