//! # Hearth API Server Library
//!
//! This library provides the HTTP layer of Hearth, the household-management
//! application: roommates track shared grocery purchases, rotate cleaning
//! tasks, and view contribution statistics.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers
//! - `views`: Post-mutation stale-view notification
//! - `middleware`: Security headers layer

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod views;
