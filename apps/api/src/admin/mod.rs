// Admin API: JSON CRUD over every Content Store entity plus media uploads.
// Guarded by a bearer token when ADMIN_TOKEN is configured.

pub mod auth;
pub mod handlers;
pub mod uploads;
