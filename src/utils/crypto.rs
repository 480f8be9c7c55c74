//! Hash Primitives
//!
//! Thin wrappers over the RustCrypto / tiny-keccak primitives the
//! derivation engine consumes: HMAC-SHA512 for the HD tree, Keccak-256
//! and EIP-55 for addresses.

use hmac::digest::InvalidLength;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use tiny_keccak::{Hasher, Keccak};
use zeroize::Zeroizing;

type HmacSha512 = Hmac<Sha512>;

/// HMAC-SHA512 of `data` under `key`, returned in a zeroizing buffer
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<Zeroizing<[u8; 64]>, InvalidLength> {
    let mut mac = <HmacSha512 as Mac>::new_from_slice(key)?;
    mac.update(data);

    let mut out = Zeroizing::new([0u8; 64]);
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

/// Keccak256 hash (used for Ethereum-style addresses)
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Render raw 20-byte address bytes in EIP-55 mixed-case form
pub fn to_checksum_address(address: &[u8]) -> String {
    let lower = hex::encode(address);
    let hash = keccak256(lower.as_bytes());

    let mut result = String::with_capacity(2 + lower.len());
    result.push_str("0x");
    for (i, ch) in lower.chars().enumerate() {
        let byte = hash[i / 2];
        let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };

        if ch.is_ascii_alphabetic() && nibble >= 8 {
            result.push(ch.to_ascii_uppercase());
        } else {
            result.push(ch);
        }
    }

    result
}
