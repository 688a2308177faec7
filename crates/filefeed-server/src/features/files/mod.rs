//! File management feature: upload, list, delete

pub mod commands;
pub mod queries;
mod routes;

pub use routes::files_routes;
