/// Database connection pool management
pub mod connection;
/// Persisted entities and their queries
pub mod models;
