//! Security Module
//!
//! Secure memory utilities for seeds, keys and chain codes.

pub mod secure_memory;

pub use secure_memory::*;
