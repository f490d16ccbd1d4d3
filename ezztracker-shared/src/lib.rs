//! # ezzTracker Shared Library
//!
//! Data layer and authentication primitives used by the ezzTracker admin
//! server.
//!
//! ## Module Organization
//!
//! - `db`: SQLite pool, migrations and list queries
//! - `models`: Database models and their CRUD operations
//! - `auth`: Password hashing, login, session tokens and the access policy
//! - `seed`: First-run database bootstrap

pub mod auth;
pub mod db;
pub mod models;
pub mod seed;

/// Current version of the ezzTracker shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
