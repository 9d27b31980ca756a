//! Command-line interface definitions for the comics feed generator.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Options can be provided via command-line flags or environment variables,
//! matching how the tool runs from a scheduled CI job.

use clap::Parser;
use std::error::Error;

/// Command-line arguments for the comics feed generator.
///
/// # Examples
///
/// ```sh
/// # Basic usage, writing docs/comics.xml and docs/images/
/// comics_feed --pages-base-url https://me.github.io/comics
///
/// # On GitHub Actions the base URL derives from the repository pair
/// GITHUB_REPOSITORY=me/comics comics_feed
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Output directory for the feed document and cached images
    #[arg(short, long, default_value = "docs")]
    pub output_dir: String,

    /// Path of the JSON state file
    #[arg(short, long, default_value = "state.json")]
    pub state_file: String,

    /// Externally-resolvable base URL the feed and images are served under
    #[arg(long, env = "PAGES_BASE_URL")]
    pub pages_base_url: Option<String>,

    /// owner/repo pair used to derive a GitHub Pages base URL when
    /// --pages-base-url is not given
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub github_repository: Option<String>,
}

impl Cli {
    /// Resolve the public base URL cached images are published under.
    ///
    /// An explicit `--pages-base-url` wins; otherwise `owner/repo` becomes
    /// `https://owner.github.io/repo`. Having neither is a configuration
    /// error.
    pub fn public_base_url(&self) -> Result<String, Box<dyn Error>> {
        if let Some(base) = &self.pages_base_url {
            return Ok(base.trim_end_matches('/').to_string());
        }
        if let Some(repo) = &self.github_repository {
            if let Some((owner, name)) = repo.split_once('/') {
                if !owner.is_empty() && !name.is_empty() {
                    return Ok(format!("https://{owner}.github.io/{name}"));
                }
            }
            return Err(format!("GITHUB_REPOSITORY is not an owner/repo pair: {repo}").into());
        }
        Err("no public base URL; set --pages-base-url or GITHUB_REPOSITORY".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(pages_base_url: Option<&str>, github_repository: Option<&str>) -> Cli {
        Cli {
            output_dir: "docs".to_string(),
            state_file: "state.json".to_string(),
            pages_base_url: pages_base_url.map(str::to_string),
            github_repository: github_repository.map(str::to_string),
        }
    }

    #[test]
    fn test_cli_parsing_flags() {
        let cli = Cli::parse_from(&[
            "comics_feed",
            "--output-dir",
            "./site",
            "--state-file",
            "./run/state.json",
            "--pages-base-url",
            "https://me.github.io/comics",
        ]);

        assert_eq!(cli.output_dir, "./site");
        assert_eq!(cli.state_file, "./run/state.json");
        assert_eq!(cli.pages_base_url.as_deref(), Some("https://me.github.io/comics"));
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from(&["comics_feed", "-o", "/tmp/site", "-s", "/tmp/state.json"]);

        assert_eq!(cli.output_dir, "/tmp/site");
        assert_eq!(cli.state_file, "/tmp/state.json");
    }

    #[test]
    fn test_explicit_base_url_wins() {
        let cli = cli(Some("https://comics.example.net/"), Some("me/comics"));
        assert_eq!(cli.public_base_url().unwrap(), "https://comics.example.net");
    }

    #[test]
    fn test_base_url_derived_from_repository_pair() {
        let cli = cli(None, Some("me/comics"));
        assert_eq!(cli.public_base_url().unwrap(), "https://me.github.io/comics");
    }

    #[test]
    fn test_malformed_repository_pair_is_an_error() {
        assert!(cli(None, Some("just-a-name")).public_base_url().is_err());
        assert!(cli(None, Some("/comics")).public_base_url().is_err());
    }

    #[test]
    fn test_missing_base_url_is_an_error() {
        assert!(cli(None, None).public_base_url().is_err());
    }
}
