//! Configuration module for arxiv-snapshot
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every setting has a built-in default, so running without a file snapshots
//! the arXiv cs.RO listing.
//!
//! # Example
//!
//! ```no_run
//! use arxiv_snapshot::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("snapshot.toml")).unwrap();
//! println!("Crawling {}", config.listing.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, ListingConfig, OutputConfig, UserAgentConfig, DEFAULT_BASE_URL, DEFAULT_PAGE_SIZE,
};

// Re-export parser functions
pub use parser::{load_config, parse_config, read_config};
pub use validation::validate;
