//! Configuration module for Shopscrape
//!
//! Every setting has a built-in default, so the scraper runs without any
//! file at all. A TOML file may override any subset of the values.
//!
//! # Example
//!
//! ```no_run
//! use shopscrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("shopscrape.toml")).unwrap();
//! println!("Request timeout: {}s", config.http.timeout_secs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, OutputConfig, RetryConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
