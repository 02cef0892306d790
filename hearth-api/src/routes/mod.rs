/// API route handlers
///
/// This module contains all HTTP route handlers organized by resource:
/// - `health`: Health check endpoint
/// - `auth`: Signup, login, logout, current user
/// - `tasks`: Cleaning task CRUD and completion
/// - `purchases`: Grocery purchase CRUD
/// - `roommates`: Roster, contribution stats, profile, account removal
/// - `dashboard`: Aggregated per-member overview

pub mod auth;
pub mod dashboard;
pub mod health;
pub mod purchases;
pub mod roommates;
pub mod tasks;
