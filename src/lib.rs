//! IPTV settings library
//!
//! Layered configuration store and the channel/test-result record shapes
//! shared with the fetch and speed-test pipeline.

pub mod cli;
pub mod config;
pub mod error;
pub mod paths;
pub mod types;
