//! Strip-image extraction for the supported comic sites.
//!
//! Each site module implements a set of [`Strategy`] values. A strategy
//! inspects an HTML document and produces zero or more scored
//! [`Candidate`] URLs; the site module pools candidates from all of its
//! strategies and the best score wins. Scoring exists because the more
//! permissive strategies (regex scans over raw markup, social meta tags)
//! can surface decoy assets such as social-share preview crops, and those
//! must never outrank the real strip artwork.
//!
//! # Supported Sites
//!
//! | Site | Module | Strategies |
//! |------|--------|------------|
//! | GoComics | [`gocomics`] | embedded JSON payload, visible images, raw-markup scan, social meta tags |
//! | The Far Side | [`farside`] | social meta tags, visible images |
//!
//! # Common Patterns
//!
//! Each site module exports `strip_image_url(html)`, returning the single
//! best normalized URL. [`find_strip_image`] dispatches on
//! [`SiteKind`] and converts an empty result into the named
//! [`NoImage`] error so callers can tell "nothing extractable" apart from
//! a transport failure.

pub mod farside;
pub mod gocomics;

use crate::models::SiteKind;
use std::error::Error;
use std::fmt;

/// A scored image-URL candidate, produced and consumed within one
/// extraction call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Normalized absolute URL.
    pub url: String,
    /// Host/pattern specificity score. Higher wins.
    pub score: i32,
}

/// One way of digging image-URL candidates out of an HTML document.
///
/// Implementations must tolerate arbitrary markup and return an empty
/// vector rather than fail; selection happens in the pooled ranking, not
/// inside individual strategies.
pub trait Strategy {
    /// Extract zero or more candidates from the document.
    fn extract(&self, html: &str) -> Vec<Candidate>;
}

/// No candidate survived extraction and exclusion for a page.
///
/// Distinct from transport errors: the page was fetched and parsed, but
/// nothing on it looked like the strip artwork.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoImage {
    site: &'static str,
}

impl NoImage {
    fn for_site(site: SiteKind) -> Self {
        let site = match site {
            SiteKind::GoComics => "gocomics",
            SiteKind::FarSide => "thefarside",
        };
        NoImage { site }
    }
}

impl fmt::Display for NoImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no strip image found on {} page", self.site)
    }
}

impl Error for NoImage {}

/// Pick the highest-scoring candidate, first one wins on ties.
///
/// Stability matters: strategies are pooled in precedence order, so a tie
/// resolves to the more trusted strategy's find.
pub(crate) fn pick_best(candidates: Vec<Candidate>) -> Option<String> {
    let mut best: Option<Candidate> = None;
    for candidate in candidates {
        match &best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }
    best.map(|c| c.url)
}

/// Extract the single best strip-image URL for a source's site.
#[tracing::instrument(level = "debug", skip(html))]
pub fn find_strip_image(site: SiteKind, html: &str) -> Result<String, NoImage> {
    let found = match site {
        SiteKind::GoComics => gocomics::strip_image_url(html),
        SiteKind::FarSide => farside::strip_image_url(html),
    };
    found.ok_or_else(|| NoImage::for_site(site))
}
