//! `parlo-worker` library crate.
//!
//! Exposes the config and dispatcher modules; the binary entrypoint
//! lives in `main.rs`.

pub mod config;
pub mod dispatcher;
