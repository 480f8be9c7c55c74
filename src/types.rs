//! Shared types for pq-seed
//!
//! Algorithm kinds, their usage metadata, and the records the derivation
//! engine produces.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{SeedError, SeedResult};
use crate::security::AlgorithmSeed;
use crate::wallet::derivation_path::coin_types;

/// Bit length of every algorithm seed
pub const SEED_BITS: u32 = 256;

// =============================================================================
// Algorithm Types
// =============================================================================

/// Signature schemes fed from the derivation tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Legacy,
    Falcon,
    #[serde(alias = "ml-dsa")]
    MlDsa,
    #[serde(alias = "slh-dsa")]
    SlhDsa,
    Xmss,
}

impl Algorithm {
    /// All algorithms, in standard table order
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Legacy,
        Algorithm::Falcon,
        Algorithm::MlDsa,
        Algorithm::SlhDsa,
        Algorithm::Xmss,
    ];

    /// Identifier used as the report and config key
    pub fn id(&self) -> &'static str {
        match self {
            Algorithm::Legacy => "legacy",
            Algorithm::Falcon => "falcon",
            Algorithm::MlDsa => "ml_dsa",
            Algorithm::SlhDsa => "slh_dsa",
            Algorithm::Xmss => "xmss",
        }
    }

    /// BIP-44 coin type namespacing this algorithm's key space
    pub fn coin_type(&self) -> u32 {
        match self {
            Algorithm::Legacy => coin_types::ETHEREUM,
            Algorithm::Falcon => coin_types::FALCON,
            Algorithm::MlDsa => coin_types::ML_DSA,
            Algorithm::SlhDsa => coin_types::SLH_DSA,
            Algorithm::Xmss => coin_types::XMSS,
        }
    }

    /// `m/44'/<coin>'/0'/0/0`
    pub fn standard_path(&self) -> &'static str {
        match self {
            Algorithm::Legacy => "m/44'/60'/0'/0/0",
            Algorithm::Falcon => "m/44'/9000'/0'/0/0",
            Algorithm::MlDsa => "m/44'/9001'/0'/0/0",
            Algorithm::SlhDsa => "m/44'/9002'/0'/0/0",
            Algorithm::Xmss => "m/44'/9003'/0'/0/0",
        }
    }

    /// Only the classical branch gets an address
    pub fn attaches_address(&self) -> bool {
        matches!(self, Algorithm::Legacy)
    }

    /// Key and signature sizes of the scheme this seed feeds
    pub fn usage(&self) -> AlgorithmUsage {
        match self {
            Algorithm::Legacy => AlgorithmUsage::Ecdsa {
                curve: "secp256k1".to_string(),
                public_key_bytes: 33,
                uncompressed_public_key_bytes: 65,
                signature_bytes: 65,
                address_format: "keccak256-20".to_string(),
            },
            Algorithm::Falcon => AlgorithmUsage::Falcon {
                parameter_set: "Falcon-512".to_string(),
                public_key_bytes: 897,
                secret_key_bytes: 1281,
                signature_bytes: 666,
            },
            Algorithm::MlDsa => AlgorithmUsage::MlDsa {
                parameter_set: "ML-DSA-65".to_string(),
                public_key_bytes: 1952,
                secret_key_bytes: 4032,
                signature_bytes: 3309,
            },
            Algorithm::SlhDsa => AlgorithmUsage::SlhDsa {
                parameter_set: "SLH-DSA-SHA2-128s".to_string(),
                public_key_bytes: 32,
                secret_key_bytes: 64,
                signature_bytes: 7856,
            },
            Algorithm::Xmss => AlgorithmUsage::Xmss {
                parameter_set: "XMSS-SHA2_10_256".to_string(),
                public_key_bytes: 64,
                signature_bytes: 2500,
                tree_height: 10,
                max_signatures: 1024,
                stateful: true,
            },
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.id())
    }
}

impl FromStr for Algorithm {
    type Err = SeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" => Ok(Algorithm::Legacy),
            "falcon" => Ok(Algorithm::Falcon),
            "ml_dsa" | "ml-dsa" => Ok(Algorithm::MlDsa),
            "slh_dsa" | "slh-dsa" => Ok(Algorithm::SlhDsa),
            "xmss" => Ok(Algorithm::Xmss),
            _ => Err(SeedError::config_error(format!("unknown algorithm id '{}'", s))),
        }
    }
}

/// Per-scheme usage metadata, tagged by `scheme`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum AlgorithmUsage {
    Ecdsa {
        curve: String,
        public_key_bytes: u32,
        uncompressed_public_key_bytes: u32,
        signature_bytes: u32,
        address_format: String,
    },
    Falcon {
        parameter_set: String,
        public_key_bytes: u32,
        secret_key_bytes: u32,
        signature_bytes: u32,
    },
    MlDsa {
        parameter_set: String,
        public_key_bytes: u32,
        secret_key_bytes: u32,
        signature_bytes: u32,
    },
    SlhDsa {
        parameter_set: String,
        public_key_bytes: u32,
        secret_key_bytes: u32,
        signature_bytes: u32,
    },
    Xmss {
        parameter_set: String,
        public_key_bytes: u32,
        signature_bytes: u32,
        tree_height: u32,
        max_signatures: u32,
        stateful: bool,
    },
}

impl AlgorithmUsage {
    /// The algorithm this metadata describes
    pub fn algorithm(&self) -> Algorithm {
        match self {
            AlgorithmUsage::Ecdsa { .. } => Algorithm::Legacy,
            AlgorithmUsage::Falcon { .. } => Algorithm::Falcon,
            AlgorithmUsage::MlDsa { .. } => Algorithm::MlDsa,
            AlgorithmUsage::SlhDsa { .. } => Algorithm::SlhDsa,
            AlgorithmUsage::Xmss { .. } => Algorithm::Xmss,
        }
    }

    pub fn signature_bytes(&self) -> u32 {
        match self {
            AlgorithmUsage::Ecdsa { signature_bytes, .. }
            | AlgorithmUsage::Falcon { signature_bytes, .. }
            | AlgorithmUsage::MlDsa { signature_bytes, .. }
            | AlgorithmUsage::SlhDsa { signature_bytes, .. }
            | AlgorithmUsage::Xmss { signature_bytes, .. } => *signature_bytes,
        }
    }

    /// Whether the scheme must track used one-time keys
    pub fn is_stateful(&self) -> bool {
        matches!(self, AlgorithmUsage::Xmss { stateful: true, .. })
    }
}

// =============================================================================
// Derivation Output
// =============================================================================

/// One algorithm's derived seed. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlgorithmSeedRecord {
    algorithm: Algorithm,
    path: String,
    #[serde(with = "crate::serde_hex::secret")]
    seed: AlgorithmSeed,
    seed_length: u32,
    usage: AlgorithmUsage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    address: Option<String>,
}

impl AlgorithmSeedRecord {
    pub(crate) fn new(
        algorithm: Algorithm,
        path: String,
        seed: AlgorithmSeed,
        address: Option<String>,
    ) -> Self {
        Self {
            algorithm,
            path,
            seed_length: seed.bit_len() as u32,
            seed,
            usage: algorithm.usage(),
            address,
        }
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Path text as configured (not re-rendered)
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn seed(&self) -> &AlgorithmSeed {
        &self.seed
    }

    /// Declared seed length in bits
    pub fn seed_length(&self) -> u32 {
        self.seed_length
    }

    pub fn usage(&self) -> &AlgorithmUsage {
        &self.usage
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

/// Ordered mapping of algorithm id to record, in path table order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    records: Vec<AlgorithmSeedRecord>,
}

impl SeedReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record; an algorithm may appear once
    pub fn push(&mut self, record: AlgorithmSeedRecord) -> SeedResult<()> {
        if self.get(record.algorithm).is_some() {
            return Err(SeedError::internal(format!(
                "duplicate record for algorithm '{}'",
                record.algorithm
            )));
        }
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&AlgorithmSeedRecord> {
        self.records.iter().find(|r| r.algorithm == algorithm)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AlgorithmSeedRecord> {
        self.records.iter()
    }

    /// Algorithm ids in report order
    pub fn algorithms(&self) -> Vec<Algorithm> {
        self.records.iter().map(|r| r.algorithm).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a SeedReport {
    type Item = &'a AlgorithmSeedRecord;
    type IntoIter = std::slice::Iter<'a, AlgorithmSeedRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl Serialize for SeedReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.records.len()))?;
        for record in &self.records {
            map.serialize_entry(record.algorithm.id(), record)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SeedReport {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ReportVisitor;

        impl<'de> Visitor<'de> for ReportVisitor {
            type Value = SeedReport;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of algorithm id to seed record")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<SeedReport, A::Error> {
                let mut report = SeedReport::new();
                while let Some((key, record)) =
                    access.next_entry::<Algorithm, AlgorithmSeedRecord>()?
                {
                    if key != record.algorithm {
                        return Err(serde::de::Error::custom(format!(
                            "record under '{}' is for algorithm '{}'",
                            key, record.algorithm
                        )));
                    }
                    report.push(record).map_err(serde::de::Error::custom)?;
                }
                Ok(report)
            }
        }

        deserializer.deserialize_map(ReportVisitor)
    }
}
