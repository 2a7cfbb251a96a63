//! Waitlist Gateway Library
//!
//! HTTP signup endpoint for a landing-page waitlist, backed by a single
//! PostgreSQL table with a unique constraint on `email`.

pub mod api;
pub mod config;
pub mod error;
pub mod pool;
pub mod store;
