//! Utilities Module
//!
//! Hash primitives, logging and configuration shared across the crate.

pub mod config;
pub mod crypto;
pub mod logging;

pub use config::*;
pub use crypto::*;
