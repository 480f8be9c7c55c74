//! Serde helpers for secret byte buffers
//!
//! Secret buffers do not implement `Serialize` themselves; fields that are
//! meant to leave the process (the seed column of a report) opt in with
//! `#[serde(with = "crate::serde_hex::secret")]`.

use serde::{Deserialize, Deserializer, Serializer};
use zeroize::Zeroizing;

use crate::security::SecretBytes;

/// Serialize/deserialize `SecretBytes<N>` as a lowercase hex string
pub mod secret {
    use super::*;

    pub fn serialize<S, const N: usize>(
        bytes: &SecretBytes<N>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let hex = bytes.expose_hex();
        serializer.serialize_str(&hex)
    }

    pub fn deserialize<'de, D, const N: usize>(deserializer: D) -> Result<SecretBytes<N>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = Zeroizing::new(String::deserialize(deserializer)?);
        SecretBytes::from_hex(&s)
            .map_err(|_| serde::de::Error::custom(format!("expected {} hex-encoded bytes", N)))
    }
}
