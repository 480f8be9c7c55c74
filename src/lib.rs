//! pq-seed Core Library
//!
//! Derives one independent 256-bit seed per signature scheme (secp256k1
//! ECDSA plus the post-quantum Falcon, ML-DSA, SLH-DSA and XMSS) from a
//! single BIP39 mnemonic, over a BIP-32 derivation tree.
//!
//! # Architecture
//!
//! This crate provides:
//! - **wallet**: mnemonic stretching, path parsing, HD derivation, fan-out
//! - **types**: algorithm kinds, usage metadata, seed records and reports
//! - **security**: zeroizing secret buffers
//! - **utils**: hash primitives, redacting logger, configuration
//!
//! # Security
//!
//! This crate uses `zeroize` to securely clear sensitive data from memory.
//! Master seeds, node keys and chain codes are wiped when dropped, and no
//! error or log line carries words, seeds or keys.
//!
//! # Example
//!
//! ```rust,ignore
//! use pq_seed::{derive_all, Algorithm, PathTable};
//!
//! let report = derive_all(&words, "", &PathTable::standard())?;
//! let falcon_seed = report.get(Algorithm::Falcon).unwrap().seed();
//! ```

pub mod error;
pub mod security;
pub mod serde_hex;
pub mod types;
pub mod utils;
pub mod wallet;

// Re-export key types for convenience
pub use error::{ErrorCode, SeedError, SeedResult};
pub use security::{AlgorithmSeed, ChainCode, MasterSeed, SecretBytes};
pub use types::*;

// Re-export derivation entry points
pub use wallet::{
    derive_all,
    derive_all_from_seed,
    derive_all_with_style,
    derive_one,
    parse_path,
    AddressStyle,
    DerivationPath,
    HdNode,
    PathTable,
};

pub use utils::config::DeriverConfig;
