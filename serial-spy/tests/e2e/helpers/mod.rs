//! Shared E2E test helpers.
//!
//! Provides channel settings builders, a scriptable mock transport and a
//! console capture buffer.

pub mod config;
pub mod console;
pub mod mock_transport;
