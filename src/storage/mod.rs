//! Storage Layer
//!
//! SQLite connection management for the activity store.

pub mod database;

pub use database::*;
