//! Wallet Module
//!
//! Mnemonic stretching, path parsing, HD derivation and the per-algorithm
//! fan-out over a path table.

pub mod address;
pub mod derivation;
pub mod derivation_path;
pub mod hd_node;
pub mod mnemonic;
pub mod path_table;

pub use address::{derive_address, derive_checksum_address, AddressStyle};
pub use derivation::*;
pub use derivation_path::{parse_path, DerivationComponent, DerivationPath, PathError, HARDENED};
pub use hd_node::{DerivationError, HdNode};
pub use mnemonic::{is_valid_mnemonic, stretch, stretch_phrase, validate_words, MnemonicError};
pub use path_table::PathTable;
