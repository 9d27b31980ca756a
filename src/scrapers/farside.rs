//! The Far Side strip-image extraction.
//!
//! Structurally much simpler than GoComics: the daily image is referenced
//! by the social meta tags or a plain `<img>`, usually as a root-relative
//! path on the site's own origin. The only trap is the site logo artwork,
//! which is excluded by filename.

use crate::normalize::normalize_url;
use crate::scrapers::{Candidate, Strategy, pick_best};
use scraper::{Html, Selector};

const ORIGIN: &str = "https://www.thefarside.com";

const META_IMAGE_KEYS: &[&str] = &["og:image", "og:image:secure_url", "twitter:image", "twitter:image:src"];

/// Normalize one raw candidate, dropping logo artwork.
fn candidate(raw: &str) -> Option<Candidate> {
    let url = normalize_url(raw, ORIGIN);
    let filename = url.rsplit('/').next().unwrap_or(&url);
    if filename.to_ascii_lowercase().contains("logo") {
        return None;
    }
    // Flat scoring; precedence order alone decides.
    Some(Candidate { url, score: 0 })
}

struct SocialMeta;

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

/// Extract the daily image URL from a Far Side page.
pub fn strip_image_url(html: &str) -> Option<String> {
    let strategies: [&dyn Strategy; 2] = [&SocialMeta, &VisibleImages];

    let mut pool = Vec::new();
    for strategy in strategies {
        pool.extend(strategy.extract(html));
    }
    pick_best(pool)
}
