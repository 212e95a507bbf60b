//! Infrastructure layer for the Zellij plugin sandbox.
//!
//! Inside the sandbox the host filesystem is mounted under `/host`, so every
//! on-disk location the crate uses is resolved here.

pub mod paths;

pub use paths::{get_data_dir, otlp_export_path};
