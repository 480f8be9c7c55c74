//! Address Derivation
//!
//! Turns the legacy branch's leaf private key into an Ethereum-style
//! address: Keccak-256 over the 64-byte uncompressed public key (prefix
//! byte dropped), low 20 bytes, `0x`-prefixed hex.

use secp256k1::{Secp256k1, SecretKey, Signing};

use crate::error::{SeedError, SeedResult};
use crate::utils::crypto::{keccak256, to_checksum_address};

/// How the legacy address is rendered in a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AddressStyle {
    /// All-lowercase hex
    #[default]
    Lowercase,
    /// EIP-55 mixed case
    Checksum,
}

impl AddressStyle {
    pub fn from_checksum_flag(checksum: bool) -> Self {
        if checksum {
            AddressStyle::Checksum
        } else {
            AddressStyle::Lowercase
        }
    }

    pub fn render<C: Signing>(&self, secp: &Secp256k1<C>, private_key: &[u8; 32]) -> SeedResult<String> {
        match self {
            AddressStyle::Lowercase => derive_address(secp, private_key),
            AddressStyle::Checksum => derive_checksum_address(secp, private_key),
        }
    }
}

/// Raw 20-byte address for a private key
pub fn address_bytes<C: Signing>(
    secp: &Secp256k1<C>,
    private_key: &[u8; 32],
) -> SeedResult<[u8; 20]> {
    let secret_key = SecretKey::from_slice(private_key)
        .map_err(|e| SeedError::invalid_private_key(format!("secp256k1: {}", e)))?;

    let uncompressed = secret_key.public_key(secp).serialize_uncompressed();
    let digest = keccak256(&uncompressed[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    Ok(address)
}

/// Lowercase `0x` address for a private key
pub fn derive_address<C: Signing>(
    secp: &Secp256k1<C>,
    private_key: &[u8; 32],
) -> SeedResult<String> {
    let address = address_bytes(secp, private_key)?;
    Ok(format!("0x{}", hex::encode(address)))
}

/// EIP-55 mixed-case address for a private key
pub fn derive_checksum_address<C: Signing>(
    secp: &Secp256k1<C>,
    private_key: &[u8; 32],
) -> SeedResult<String> {
    let address = address_bytes(secp, private_key)?;
    Ok(to_checksum_address(&address))
}
