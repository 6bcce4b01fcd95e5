/// HTTP health check endpoints
pub mod health;
/// Periodic due-task reconciler
pub mod reminder;
