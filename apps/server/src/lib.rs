//! Planvault - plan management API
//!
//! Library crate exposing the application modules for the `plan-server`
//! binary and for integration tests.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod startup;
pub mod state;

pub use error::{Error, Result};
