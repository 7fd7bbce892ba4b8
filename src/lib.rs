//! # combine-code - bundle a source tree into one document
//!
//! Walks a directory, keeps the files whose extension is requested, honors
//! the root `.gitignore` and explicit directory exclusions, and writes every
//! kept file into a single line-numbered document:
//!
//! ```text
//! ===== FILE START: src/main.go =====
//!    1 | package main
//!    2 |
//! ===== FILE END: src/main.go =====
//!
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! combine-code --path . --includeExtensions go,js --excludeDirs node_modules,vendor
//! ```
//!
//! ## Library Usage
//!
//! ```rust,no_run
//! use combine_code::config::CombineConfig;
//! use std::path::PathBuf;
//!
//! let config = CombineConfig {
//!     root: PathBuf::from("src"),
//!     extensions: vec!["rs".to_string()],
//!     excluded_dirs: vec![],
//!     output: PathBuf::from("combined_code.md"),
//! };
//! let stats = combine_code::combine(&config)?;
//! println!("{} files combined", stats.files_written);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod combine;
pub mod config;

pub use cli::{Cli, Output};
pub use combine::{CombineStats, Combiner, combine};
pub use config::CombineConfig;

/// Result type alias for combine-code operations
pub type Result<T> = anyhow::Result<T>;
