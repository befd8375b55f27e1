//! serial-spy library.
//!
//! This library exposes internal modules for integration testing.
//! In production, `serial-spy` is used as a binary (main.rs).

pub mod app;
pub mod cli;
pub mod coordinator;
pub mod logging;
pub mod serial;
