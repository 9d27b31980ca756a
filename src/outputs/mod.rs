//! Output generation for the published feed.
//!
//! # Submodules
//!
//! - [`feed`]: Serializes the entry history to the RSS 2.0 document that
//!   feed readers subscribe to
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── comics.xml    # regenerated in full every run
//! └── images/       # cached strip images (see crate::cache)
//! ```

pub mod feed;
