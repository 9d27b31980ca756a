//! Local image cache with deterministic naming.
//!
//! Cached strips live under `<output dir>/images/` and are served from the
//! configured public base URL. Filenames are derived from the source URL's
//! digest, so the same URL always maps to the same file and is fetched at
//! most once.

use crate::http::Fetch;
use crate::utils::{guess_extension, short_digest};
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{debug, info, instrument};

/// Cache directory name under the output directory, and path segment under
/// the public base URL.
pub const IMAGES_SEGMENT: &str = "images";

/// Download an image into the cache and return its public URL.
///
/// The filename is `{slug}-{date}-{digest}.{ext}` with a 12-hex-char
/// digest of `url`. When that file already exists no fetch and no write
/// happens, so calling this repeatedly with the same arguments is safe and
/// returns the identical path.
///
/// # Errors
///
/// Transport errors from the fetch and filesystem errors from the write
/// propagate to the caller.
#[instrument(level = "info", skip_all, fields(%url, %slug, %date))]
pub async fn cache_image(
    fetcher: &impl Fetch,
    url: &str,
    slug: &str,
    date: &str,
    images_dir: &Path,
    public_base: &str,
) -> Result<String, Box<dyn Error>> {
    let filename = format!(
        "{slug}-{date}-{digest}.{ext}",
        digest = short_digest(url),
        ext = guess_extension(url),
    );
    let path = images_dir.join(&filename);

    if path.exists() {
        debug!(path = %path.display(), "Image already cached; skipping fetch");
    } else {
        let bytes = fetcher.get_bytes(url).await?;
        fs::create_dir_all(images_dir).await?;
        fs::write(&path, &bytes).await?;
        info!(path = %path.display(), bytes = bytes.len(), "Cached strip image");
    }

    Ok(format!(
        "{}/{}/{}",
        public_base.trim_end_matches('/'),
        IMAGES_SEGMENT,
        filename
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        bytes: Vec<u8>,
        fetches: AtomicUsize,
    }

    impl CountingFetcher {
        fn new(bytes: &[u8]) -> Self {
            CountingFetcher {
                bytes: bytes.to_vec(),
                fetches: AtomicUsize::new(0),
            }
        }

        fn fetch_count(&self) -> usize {
            self.fetches.load(Ordering::SeqCst)
        }
    }

    impl Fetch for CountingFetcher {
        async fn get_text(&self, _url: &str) -> Result<String, Box<dyn Error>> {
            unreachable!("cache never fetches text")
        }

        async fn get_bytes(&self, _url: &str) -> Result<Vec<u8>, Box<dyn Error>> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            Ok(self.bytes.clone())
        }
    }

    struct FailingFetcher;

    impl Fetch for FailingFetcher {
        async fn get_text(&self, _url: &str) -> Result<String, Box<dyn Error>> {
            Err("connection refused".into())
        }

        async fn get_bytes(&self, _url: &str) -> Result<Vec<u8>, Box<dyn Error>> {
            Err("connection refused".into())
        }
    }

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "comics_feed_cache_{}_{}",
            name,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[tokio::test]
    async fn test_same_url_fetched_exactly_once() {
        let dir = test_dir("once");
        let fetcher = CountingFetcher::new(b"strip bytes");
        let url = "https://featureassets.gocomics.com/assets/abc.png";

        let first = cache_image(&fetcher, url, "garfield", "2026-08-06", &dir, "https://me.github.io/comics")
            .await
            .unwrap();
        let second = cache_image(&fetcher, url, "garfield", "2026-08-06", &dir, "https://me.github.io/comics")
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.fetch_count(), 1);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_existing_file_means_no_network_at_all() {
        let dir = test_dir("prewarmed");
        let url = "https://featureassets.gocomics.com/assets/warm.png";
        let filename = format!("garfield-2026-08-06-{}.png", short_digest(url));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(&filename), b"already here").unwrap();

        // A fetcher that fails on any call proves the cache short-circuits.
        let public = cache_image(&FailingFetcher, url, "garfield", "2026-08-06", &dir, "https://me.github.io/comics")
            .await
            .unwrap();
        assert_eq!(
            public,
            format!("https://me.github.io/comics/images/{filename}")
        );
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_writes_bytes_verbatim() {
        let dir = test_dir("verbatim");
        let fetcher = CountingFetcher::new(b"\x89PNG fake body");
        let url = "https://featureassets.gocomics.com/assets/v.png";

        cache_image(&fetcher, url, "peanuts", "2026-08-06", &dir, "https://me.github.io/comics")
            .await
            .unwrap();

        let filename = format!("peanuts-2026-08-06-{}.png", short_digest(url));
        let written = std::fs::read(dir.join(filename)).unwrap();
        assert_eq!(written, b"\x89PNG fake body");
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_transport_errors_propagate() {
        let dir = test_dir("failing");
        let result = cache_image(
            &FailingFetcher,
            "https://featureassets.gocomics.com/assets/missing.png",
            "garfield",
            "2026-08-06",
            &dir,
            "https://me.github.io/comics",
        )
        .await;
        assert!(result.is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
