//! # Gradus Application Library
//!
//! Library surface of THE BINARY, exposing the HTTP API router and CLI
//! wiring so integration tests can drive them without spawning a
//! process.

pub mod api;
pub mod cli;
