//! HD Node
//!
//! BIP-32 private child key derivation over secp256k1.
//!
//! ```text
//! master:       I = HMAC-SHA512("Bitcoin seed", seed)
//! hardened:     I = HMAC-SHA512(c_par, 0x00 || k_par || ser32(i + 2^31))
//! non-hardened: I = HMAC-SHA512(c_par, serP(point(k_par)) || ser32(i))
//! child:        k = (IL + k_par) mod n,  c = IR
//! ```
//!
//! An `IL >= n` or a zero child key fails the step. Paths are part of the
//! protocol contract, so the next index is never tried in its place.

use secp256k1::{PublicKey, Scalar, Secp256k1, SecretKey, Signing};
use zeroize::Zeroizing;

use super::derivation_path::{DerivationComponent, DerivationPath};
use crate::security::{AlgorithmSeed, ChainCode, SecretBytes};
use crate::utils::crypto::hmac_sha512;

/// Domain-separation key for the master node
pub const MASTER_HMAC_KEY: &[u8; 12] = b"Bitcoin seed";

/// Accepted seed lengths for the master node, in bytes
pub const MIN_SEED_LEN: usize = 16;
pub const MAX_SEED_LEN: usize = 64;

/// Errors raised while walking the tree. None carry key material.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DerivationError {
    #[error("seed length {0} is outside 16..=64 bytes")]
    InvalidSeedLength(usize),

    #[error("master key is zero or not below the curve order")]
    InvalidMasterKey,

    #[error("child key at depth {depth} (step {step}) is zero or not below the curve order")]
    InvalidChildKey { depth: usize, step: String },

    #[error("{component}: {message}")]
    Primitive {
        component: &'static str,
        message: String,
    },
}

/// A private node of the derivation tree
#[derive(Clone)]
pub struct HdNode {
    private_key: SecretBytes<32>,
    chain_code: ChainCode,
    depth: usize,
}

impl HdNode {
    /// Derive the master node from a BIP39 seed
    pub fn master(seed: &[u8]) -> Result<Self, DerivationError> {
        if !(MIN_SEED_LEN..=MAX_SEED_LEN).contains(&seed.len()) {
            return Err(DerivationError::InvalidSeedLength(seed.len()));
        }

        let output = hmac_sha512(MASTER_HMAC_KEY, seed).map_err(|e| DerivationError::Primitive {
            component: "hmac-sha512",
            message: e.to_string(),
        })?;
        let (il, ir) = output.split_at(32);

        // from_slice rejects zero and values >= n
        let key = SecretKey::from_slice(il).map_err(|_| DerivationError::InvalidMasterKey)?;

        Ok(Self {
            private_key: secret_key_bytes(&key),
            chain_code: chain_code_from(ir)?,
            depth: 0,
        })
    }

    /// Derive one child node
    pub fn derive_child<C: Signing>(
        &self,
        secp: &Secp256k1<C>,
        step: DerivationComponent,
    ) -> Result<Self, DerivationError> {
        let parent = self.secret_key()?;

        let mut data = Zeroizing::new(Vec::with_capacity(37));
        if step.is_hardened() {
            data.push(0u8);
            data.extend_from_slice(self.private_key.expose());
        } else {
            let parent_public = PublicKey::from_secret_key(secp, &parent);
            data.extend_from_slice(&parent_public.serialize());
        }
        data.extend_from_slice(&step.full_index().to_be_bytes());

        let output = hmac_sha512(self.chain_code.expose(), &data).map_err(|e| {
            DerivationError::Primitive {
                component: "hmac-sha512",
                message: e.to_string(),
            }
        })?;
        let (il, ir) = output.split_at(32);

        let invalid_child = || DerivationError::InvalidChildKey {
            depth: self.depth + 1,
            step: step.to_string(),
        };

        let mut tweak_bytes = Zeroizing::new([0u8; 32]);
        tweak_bytes.copy_from_slice(il);
        let tweak = Scalar::from_be_bytes(*tweak_bytes).map_err(|_| invalid_child())?;
        let child = parent.add_tweak(&tweak).map_err(|_| invalid_child())?;

        Ok(Self {
            private_key: secret_key_bytes(&child),
            chain_code: chain_code_from(ir)?,
            depth: self.depth + 1,
        })
    }

    /// Walk a whole path from this node
    pub fn derive_path<C: Signing>(
        &self,
        secp: &Secp256k1<C>,
        path: &DerivationPath,
    ) -> Result<Self, DerivationError> {
        path.components()
            .iter()
            .try_fold(self.clone(), |node, step| node.derive_child(secp, *step))
    }

    pub fn private_key(&self) -> &SecretBytes<32> {
        &self.private_key
    }

    pub fn chain_code(&self) -> &ChainCode {
        &self.chain_code
    }

    /// Steps below the master node
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// 33-byte compressed public key of this node
    pub fn public_key<C: Signing>(&self, secp: &Secp256k1<C>) -> Result<[u8; 33], DerivationError> {
        let key = self.secret_key()?;
        Ok(PublicKey::from_secret_key(secp, &key).serialize())
    }

    /// Consume the node, keeping only its private key as an algorithm seed
    pub fn into_seed(self) -> AlgorithmSeed {
        self.private_key
    }

    fn secret_key(&self) -> Result<SecretKey, DerivationError> {
        SecretKey::from_slice(self.private_key.expose()).map_err(|e| DerivationError::Primitive {
            component: "secp256k1",
            message: e.to_string(),
        })
    }
}

impl std::fmt::Debug for HdNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HdNode")
            .field("depth", &self.depth)
            .finish_non_exhaustive()
    }
}

fn secret_key_bytes(key: &SecretKey) -> SecretBytes<32> {
    let mut bytes = key.secret_bytes();
    SecretBytes::from_array_wiping(&mut bytes)
}

fn chain_code_from(ir: &[u8]) -> Result<ChainCode, DerivationError> {
    ChainCode::from_slice(ir).ok_or_else(|| DerivationError::Primitive {
        component: "hmac-sha512",
        message: "unexpected output length".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    // BIP-32 test vector 1
    const TV1_SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn tv1_master() -> HdNode {
        HdNode::master(&hex::decode(TV1_SEED).unwrap()).unwrap()
    }

    #[test]
    fn test_master_from_bip32_vector() {
        let master = tv1_master();
        assert_eq!(
            master.private_key().expose_hex().as_str(),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            master.chain_code().expose_hex().as_str(),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
        assert_eq!(master.depth(), 0);

        let secp = Secp256k1::new();
        assert_eq!(
            hex::encode(master.public_key(&secp).unwrap()),
            "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2"
        );
    }

    #[test]
    fn test_mixed_hardened_and_normal_steps() {
        let secp = Secp256k1::new();
        let master = tv1_master();

        let node = master
            .derive_path(&secp, &DerivationPath::from_str("m/0'/1").unwrap())
            .unwrap();
        assert_eq!(
            node.private_key().expose_hex().as_str(),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );

        let node = master
            .derive_path(&secp, &DerivationPath::from_str("m/0'/1/2'").unwrap())
            .unwrap();
        assert_eq!(
            node.private_key().expose_hex().as_str(),
            "cbce0d719ecf7431d88e6a89fa1483e02e35092af60c042b1df2ff59fa424dca"
        );
        assert_eq!(node.depth(), 3);
    }

    #[test]
    fn test_path_walk_equals_stepwise_walk() {
        let secp = Secp256k1::new();
        let master = tv1_master();
        let path = DerivationPath::bip44(60, 0, 0, 0).unwrap();

        let mut node = master.clone();
        for step in path.components() {
            node = node.derive_child(&secp, *step).unwrap();
        }

        let walked = master.derive_path(&secp, &path).unwrap();
        assert_eq!(walked.private_key(), node.private_key());
        assert_eq!(walked.chain_code(), node.chain_code());
    }

    #[test]
    fn test_root_path_is_master() {
        let secp = Secp256k1::new();
        let master = tv1_master();
        let node = master.derive_path(&secp, &DerivationPath::root()).unwrap();
        assert_eq!(node.private_key(), master.private_key());
    }

    #[test]
    fn test_hardened_flag_changes_child() {
        let secp = Secp256k1::new();
        let master = tv1_master();
        let hardened = master.derive_child(&secp, DerivationComponent::hardened(0).unwrap()).unwrap();
        let normal = master.derive_child(&secp, DerivationComponent::normal(0).unwrap()).unwrap();
        assert_ne!(hardened.private_key(), normal.private_key());
    }

    #[test]
    fn test_seed_length_bounds() {
        assert_eq!(
            HdNode::master(&[1u8; 15]).unwrap_err(),
            DerivationError::InvalidSeedLength(15)
        );
        assert_eq!(
            HdNode::master(&[1u8; 65]).unwrap_err(),
            DerivationError::InvalidSeedLength(65)
        );
        assert!(HdNode::master(&[1u8; 64]).is_ok());
    }

    #[test]
    fn test_debug_hides_key_material() {
        let rendered = format!("{:?}", tv1_master());
        assert!(!rendered.contains("e8f32e72"));
        assert!(rendered.contains("depth"));
    }
}
