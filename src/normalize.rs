//! Candidate URL cleanup.
//!
//! Raw candidates come out of inline scripts and attribute values, so they
//! may carry JSON forward-slash escaping, entity-escaped ampersands, or be
//! protocol- or root-relative. Normalization turns each of those into an
//! absolute, directly fetchable URL and is idempotent: a URL that is
//! already normal passes through unchanged.

/// Normalize a raw image-URL candidate against a site origin.
///
/// Rules, applied in order:
/// 1. un-escape `\/` sequences and decode HTML entities such as `&amp;`
/// 2. `//host/path` becomes `https://host/path`
/// 3. `/path` is joined onto `origin`
/// 4. anything else passes through unchanged
pub fn normalize_url(raw: &str, origin: &str) -> String {
    let unescaped = raw.replace("\\/", "/");
    let decoded = html_escape::decode_html_entities(&unescaped).into_owned();

    if let Some(rest) = decoded.strip_prefix("//") {
        format!("https://{rest}")
    } else if decoded.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), decoded)
    } else {
        decoded
    }
}
