//! LocalLib Library Catalog
//!
//! A Rust implementation of the LocalLib library catalog server, providing
//! a REST JSON API for browsing books and authors, tracking loaned book
//! copies, and renewing loans.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod forms;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
