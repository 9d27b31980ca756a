//! Utility functions for cache naming and file system operations.
//!
//! This module provides helper functions used throughout the application:
//! - URL digesting for deterministic cache filenames
//! - Image extension guessing from URL paths
//! - File system validation for output directories

use sha2::{Digest, Sha256};
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Image extensions recognized when guessing a cache filename suffix.
const KNOWN_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Default extension when a URL's path gives no usable hint.
const DEFAULT_EXTENSION: &str = "jpg";

/// Compute a short deterministic digest of a URL.
///
/// The digest is the first 12 hex characters of the SHA-256 hash. It is
/// used in cache filenames, so the same URL always maps to the same file.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(short_digest("a"), short_digest("a"));
/// assert_ne!(short_digest("a"), short_digest("b"));
/// ```
pub fn short_digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let hex = format!("{:x}", hasher.finalize());
    hex[..12].to_string()
}

/// Guess an image file extension from a URL's path.
///
/// Query strings and fragments are ignored. Unrecognized or missing
/// extensions fall back to `jpg`.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(guess_extension("https://x/strip.png?width=2800"), "png");
/// assert_eq!(guess_extension("https://x/assets/0f2a"), "jpg");
/// ```
pub fn guess_extension(url: &str) -> &'static str {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or(url);
    let candidate = path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match candidate {
        Some(ext) => KNOWN_EXTENSIONS
            .iter()
            .find(|known| **known == ext)
            .copied()
            .unwrap_or(DEFAULT_EXTENSION),
        None => DEFAULT_EXTENSION,
    }
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then performs a write test
/// by creating and immediately deleting a probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_digest_is_deterministic() {
        let url = "https://featureassets.gocomics.com/assets/abc123";
        assert_eq!(short_digest(url), short_digest(url));
    }

    #[test]
    fn test_short_digest_length_and_charset() {
        let digest = short_digest("https://example.com/a.png");
        assert_eq!(digest.len(), 12);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_short_digest_distinguishes_urls() {
        assert_ne!(
            short_digest("https://example.com/a.png"),
            short_digest("https://example.com/b.png")
        );
    }

    #[test]
    fn test_guess_extension_known_types() {
        assert_eq!(guess_extension("https://x/strip.png"), "png");
        assert_eq!(guess_extension("https://x/strip.JPEG"), "jpeg");
        assert_eq!(guess_extension("https://x/strip.gif"), "gif");
        assert_eq!(guess_extension("https://x/strip.webp"), "webp");
    }

    #[test]
    fn test_guess_extension_ignores_query() {
        assert_eq!(
            guess_extension("https://x/strip.png?optimizer=image&width=2800"),
            "png"
        );
    }

    #[test]
    fn test_guess_extension_defaults_to_jpg() {
        assert_eq!(guess_extension("https://featureassets.gocomics.com/assets/0f2a"), "jpg");
        assert_eq!(guess_extension("https://x/strip.svg"), "jpg");
        assert_eq!(guess_extension("https://x/"), "jpg");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let dir = std::env::temp_dir().join(format!(
            "comics_feed_writable_{}",
            std::process::id()
        ));
        let _ = stdfs::remove_dir_all(&dir);
        let path = dir.to_str().unwrap().to_string();
        ensure_writable_dir(&path).await.unwrap();
        assert!(dir.is_dir());
        let _ = stdfs::remove_dir_all(&dir);
    }
}
