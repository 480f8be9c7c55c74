//! Secure Memory Utilities
//!
//! Fixed-size secret buffers for seeds, private keys and chain codes:
//! - Zeroization on drop, including on error paths
//! - Redacted `Debug` output
//! - Explicit exposure of the contents

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// A fixed-size byte buffer that zeroizes its contents when dropped
pub struct SecretBytes<const N: usize> {
    data: [u8; N],
}

/// 64-byte output of mnemonic stretching
pub type MasterSeed = SecretBytes<64>;

/// 32-byte leaf private key handed to a signature scheme's key generator
pub type AlgorithmSeed = SecretBytes<32>;

/// 32-byte chain code carried by every HD node
pub type ChainCode = SecretBytes<32>;

impl<const N: usize> SecretBytes<N> {
    /// Take ownership of an array. The caller's copy is not cleared.
    pub fn new(data: [u8; N]) -> Self {
        Self { data }
    }

    /// Copy from a slice of exactly `N` bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != N {
            return None;
        }
        let mut data = [0u8; N];
        data.copy_from_slice(bytes);
        Some(Self { data })
    }

    /// Copy out of an array and wipe the source
    pub fn from_array_wiping(source: &mut [u8; N]) -> Self {
        let secret = Self::new(*source);
        source.zeroize();
        secret
    }

    /// Buffer length in bytes
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Length in bits
    pub const fn bit_len(&self) -> usize {
        N * 8
    }

    /// Expose the secret bytes
    pub fn expose(&self) -> &[u8; N] {
        &self.data
    }

    /// Lowercase hex rendering, wiped when the returned guard drops
    pub fn expose_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(hex::encode(self.data))
    }

    /// Parse from hex (used when reading reports back)
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let mut bytes = Zeroizing::new(hex::decode(s)?);
        if bytes.len() != N {
            bytes.zeroize();
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut data = [0u8; N];
        data.copy_from_slice(&bytes);
        Ok(Self { data })
    }

    /// Check whether every byte is zero
    pub fn is_zero(&self) -> bool {
        is_zeroized(&self.data)
    }
}

impl<const N: usize> Zeroize for SecretBytes<N> {
    fn zeroize(&mut self) {
        self.data.zeroize();
    }
}

impl<const N: usize> Drop for SecretBytes<N> {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl<const N: usize> ZeroizeOnDrop for SecretBytes<N> {}

impl<const N: usize> Clone for SecretBytes<N> {
    fn clone(&self) -> Self {
        Self { data: self.data }
    }
}

impl<const N: usize> PartialEq for SecretBytes<N> {
    fn eq(&self, other: &Self) -> bool {
        secure_compare(&self.data, &other.data)
    }
}

impl<const N: usize> Eq for SecretBytes<N> {}

impl<const N: usize> fmt::Debug for SecretBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretBytes")
            .field("len", &N)
            .finish_non_exhaustive()
    }
}

/// Constant-time comparison. Returns true if slices are equal.
pub fn secure_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

/// Validate that data appears to be properly zeroized
pub fn is_zeroized(data: &[u8]) -> bool {
    data.iter().all(|&b| b == 0)
}
