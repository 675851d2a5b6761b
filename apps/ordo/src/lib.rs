//! # Ordo
//!
//! The Ordo binary crate as a library: HTTP API, CLI and configuration over
//! `ordo-core`. `main.rs` is a thin entry point; integration tests drive the
//! API through `ordo::api`.

pub mod api;
pub mod cli;
pub mod config;
