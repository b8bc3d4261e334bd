//! Filesystem-facing helpers for nodesync
//!
//! Provides the normalized relative path type used by every inventory entry,
//! content fingerprint helpers, and a format-agnostic store for settings,
//! inventories, rules and action stores.

pub mod checksum;
pub mod config;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use error::{Error, Result};
pub use path::{RelativePath, SEPARATOR};
