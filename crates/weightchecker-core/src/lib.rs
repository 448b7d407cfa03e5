//! WeightChecker Core: folder-size scanning, filtering, and file operations.
//!
//! This crate contains all business logic with zero UI dependencies.
//! The GUI crate owns the display state and only talks to the scanner
//! through the event channel defined in [`scanner`].
//!
//! # Modules
//!
//! - [`model`]: Scan entries, sorting, and human-readable sizes.
//! - [`scanner`]: Background traversal with cancellation and progress events.
//! - [`fileops`]: Rename and delete on the real filesystem.
//! - [`platform`]: Hidden-file detection and "reveal in file manager".
//! - [`config`]: TOML settings with defaults for every field.
//! - [`error`]: Unified error type ([`CoreError`]) and result alias ([`CoreResult`]).
pub mod config;
pub mod error;
pub mod fileops;
pub mod model;
pub mod platform;
pub mod scanner;

pub use error::{CoreError, CoreResult};
