//! LendHub Peer-to-Peer Item Sharing System
//!
//! A Rust REST API server where users list items for borrowing, renters book
//! time windows on them, and anyone can request items not yet in the catalog.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
