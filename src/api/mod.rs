//! Catalog REST client and entity types.
//!
//! This module provides the interface for communicating with the catalog
//! backend: a shared HTTP client, one typed service per resource, and the
//! records those services exchange.

mod client;
pub mod error;
pub mod types;

pub use client::{ApiClient, DeleteReport, EntityService, RestService};
pub use error::ApiError;
pub use types::{Category, Entity, EntityId, Product, Resource};
