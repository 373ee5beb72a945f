pub mod analytics;
pub mod config;
pub mod loader;
pub mod models;
pub mod report;
