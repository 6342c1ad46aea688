//! HTTP API: the user-facing surface of the pantry tracker.

pub mod app;
pub mod config;
pub mod middleware;
