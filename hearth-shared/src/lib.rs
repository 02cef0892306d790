//! # Hearth Shared Library
//!
//! This crate contains shared types, utilities, and business logic used by
//! the Hearth API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `rotation`: Round-robin turn rotation math
//! - `auth`: Authentication primitives (password hashing, session tokens)
//! - `db`: Connection pool and migration runner
//! - `error`: Household domain error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod rotation;

/// Current version of the Hearth shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
