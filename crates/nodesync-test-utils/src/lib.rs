//! Shared test utilities for the nodesync workspace.
//!
//! This crate provides fixtures to eliminate duplication across crate test
//! suites. It is a dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`inventory`]: [`InventoryBuilder`] and [`PartBuilder`] for in-memory inventories
//! - [`rules`]: [`RuleBuilder`] and data part helpers
//! - [`workspace`]: [`TestWorkspace`] writing fixtures to a temporary directory

pub mod inventory;
pub mod rules;
pub mod workspace;

pub use inventory::{InventoryBuilder, PartBuilder, ts};
pub use rules::{RuleBuilder, data_part, inventory_part};
pub use workspace::TestWorkspace;
