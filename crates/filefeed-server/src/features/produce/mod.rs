//! Produce feature: replay an uploaded file to the configured topic

pub mod commands;
mod routes;

pub use routes::produce_routes;
