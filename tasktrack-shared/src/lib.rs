//! # TaskTrack Shared Library
//!
//! Shared types and business logic used by the TaskTrack API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, tasks) and their store operations
//! - `auth`: Session tokens, password hashing, session transport, middleware
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
