/// Shared models used across features
pub mod models;
