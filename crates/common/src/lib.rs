//! StudyPoint Common Library
//!
//! Shared code for the StudyPoint catalog service:
//! - Catalog core (filtering, pagination, selection consistency)
//! - Taxonomy cache (fields, subjects, semesters)
//! - Store trait with Postgres and in-memory backends
//! - Error types and handling
//! - Configuration management
//! - Authentication utilities
//! - Metrics

pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod errors;
pub mod metrics;
pub mod store;
pub mod taxonomy;

// Re-export commonly used types
pub use config::AppConfig;
pub use db::models::{AdminUser, Field, Resource, ResourceKind, Subject};
pub use errors::{AppError, Result};
pub use store::CatalogStore;
pub use taxonomy::{TaxonomyCache, TaxonomySnapshot};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
