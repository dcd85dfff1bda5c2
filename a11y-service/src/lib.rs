//! a11y-service: accessibility scanning, AIM scoring and AI-assisted learning.

pub mod config;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
