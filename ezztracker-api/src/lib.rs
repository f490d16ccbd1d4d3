//! # ezzTracker Admin Server Library
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `middleware`: Session resolution and access policy enforcement
//! - `routes`: Landing page, health, login/logout and admin index
//! - `views`: Admin CRUD views

pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod views;
