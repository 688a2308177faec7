//! Brokers feature: broker registry visibility

pub mod queries;
mod routes;

pub use routes::brokers_routes;
