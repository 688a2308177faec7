//! Filefeed Common Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Shared types and utilities for the filefeed workspace.
//!
//! # Overview
//!
//! This crate provides common functionality used across all filefeed
//! workspace members:
//!
//! - **Error Handling**: Custom error types and result types
//! - **Logging**: Tracing subscriber configuration and initialization
//! - **Checksums**: File integrity helpers for upload bookkeeping
//! - **File Names**: Upload-directory naming policy (sanitization and
//!   collision-free paths)

pub mod checksum;
pub mod error;
pub mod files;
pub mod logging;

// Re-export commonly used types
pub use error::{FeedError, Result};
