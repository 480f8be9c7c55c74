//! Unified error types for pq-seed
//!
//! Component errors (`MnemonicError`, `PathError`, `DerivationError`) live
//! next to the code that raises them and fold into `SeedError` here.
//!
//! No message built in this crate may carry mnemonic words, seeds, chain
//! codes or private keys. Path text, algorithm ids and word positions only.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::wallet::{DerivationError, MnemonicError, PathError};

/// Main error type for all derivation operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl SeedError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_mnemonic(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidMnemonic, msg)
    }

    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPath, msg)
    }

    pub fn derivation_failed(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::DerivationFailed, msg)
    }

    pub fn invalid_private_key(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidPrivateKey, msg)
    }

    pub fn crypto_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::CryptoError, msg)
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for SeedError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidMnemonic,
    InvalidPath,
    InvalidPrivateKey,

    // Derivation errors
    DerivationFailed,
    CryptoError,

    // Configuration / parse errors
    ConfigError,
    JsonError,
    HexError,

    // Internal
    Internal,
}

/// Result type alias for derivation operations
pub type SeedResult<T> = Result<T, SeedError>;

// Conversions from component errors

impl From<MnemonicError> for SeedError {
    fn from(e: MnemonicError) -> Self {
        SeedError::invalid_mnemonic(e.to_string())
    }
}

impl From<PathError> for SeedError {
    fn from(e: PathError) -> Self {
        SeedError::invalid_path(e.to_string())
    }
}

impl From<DerivationError> for SeedError {
    fn from(e: DerivationError) -> Self {
        match e {
            DerivationError::Primitive { .. } => SeedError::crypto_error(e.to_string()),
            _ => SeedError::derivation_failed(e.to_string()),
        }
    }
}

// Conversions from common error types

impl From<serde_json::Error> for SeedError {
    fn from(e: serde_json::Error) -> Self {
        SeedError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<hex::FromHexError> for SeedError {
    fn from(e: hex::FromHexError) -> Self {
        SeedError::new(ErrorCode::HexError, e.to_string())
    }
}

impl From<std::io::Error> for SeedError {
    fn from(e: std::io::Error) -> Self {
        SeedError::new(ErrorCode::Internal, e.to_string())
    }
}

impl From<secp256k1::Error> for SeedError {
    fn from(e: secp256k1::Error) -> Self {
        SeedError::new(ErrorCode::InvalidPrivateKey, format!("secp256k1: {}", e))
    }
}

impl From<bip39::Error> for SeedError {
    fn from(e: bip39::Error) -> Self {
        MnemonicError::from(e).into()
    }
}
