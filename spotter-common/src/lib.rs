//! # Spotter Common Library
//!
//! Shared code for the Spotter scouting services:
//! - Domain models (need specifications, candidates, player records)
//! - Error types
//! - Configuration loading and data folder resolution

pub mod config;
pub mod error;
pub mod models;

pub use error::{Error, Result};
