//! Runner configuration.
//!
//! A runner configuration is a small YAML document:
//!
//! ```yaml
//! log_events: true
//! settings:
//!   input_dir: /data/in
//!   batch_size: 500
//! ```
//!
//! Every entry under `settings` is seeded into the runner context, where
//! processes read it back with `Context::setting`.
//!
//! # Example
//!
//! ```
//! use procflow::config::parse_config;
//! use std::path::Path;
//!
//! let config = parse_config("settings:\n  batch_size: 500", Path::new("inline.yml")).unwrap();
//! assert!(config.log_events);
//! assert_eq!(config.settings["batch_size"], 500);
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, parse_config};
pub use schema::RunnerConfig;
