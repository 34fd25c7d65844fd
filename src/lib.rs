//! Storedesk - a terminal admin console for a catalog REST backend.
//!
//! Categories and products are listed in sortable, filterable, paginated
//! tables and can be added, edited and deleted through the backend.

pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod logging;
pub mod table;
pub mod tasks;
pub mod ui;
pub mod views;
