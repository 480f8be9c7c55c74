//! Derivation Path Parsing
//!
//! Strict parser for BIP-32 textual paths of the form `m(/<digits>'?)*`.
//! A trailing `'`, `h` or `H` marks a hardened step. Indices are kept
//! unoffset; `full_index` applies the 2^31 hardened offset.

use std::fmt;
use std::str::FromStr;

/// Standard BIP purposes
pub mod bip_purposes {
    pub const BIP44: u32 = 44;
}

/// Coin types used by the standard path table
pub mod coin_types {
    pub const ETHEREUM: u32 = 60;
    pub const FALCON: u32 = 9000;
    pub const ML_DSA: u32 = 9001;
    pub const SLH_DSA: u32 = 9002;
    pub const XMSS: u32 = 9003;
}

/// Hardened offset for BIP-32 derivation
pub const HARDENED: u32 = 0x8000_0000;

/// Root token every path must start with
const ROOT: &str = "m";

/// Errors raised while parsing a path
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("empty derivation path")]
    Empty,

    #[error("derivation path must start with 'm'")]
    MissingRoot,

    #[error("malformed separator at component {position}")]
    MalformedSeparator { position: usize },

    #[error("non-numeric path component '{component}'")]
    NonNumeric { component: String },

    #[error("path component '{component}' exceeds 2^31 - 1")]
    IndexOutOfRange { component: String },
}

/// Single step of a derivation path. The index is always below 2^31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationComponent {
    index: u32,
    hardened: bool,
}

impl DerivationComponent {
    pub fn new(index: u32, hardened: bool) -> Result<Self, PathError> {
        if index >= HARDENED {
            return Err(PathError::IndexOutOfRange {
                component: index.to_string(),
            });
        }
        Ok(Self { index, hardened })
    }

    pub fn hardened(index: u32) -> Result<Self, PathError> {
        Self::new(index, true)
    }

    pub fn normal(index: u32) -> Result<Self, PathError> {
        Self::new(index, false)
    }

    /// Index without the hardened offset
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// Get the full index including hardened bit
    pub fn full_index(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED
        } else {
            self.index
        }
    }
}

impl fmt::Display for DerivationComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// Parsed derivation path. An empty component list is the root itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct DerivationPath {
    components: Vec<DerivationComponent>,
}

impl DerivationPath {
    pub fn new(components: Vec<DerivationComponent>) -> Self {
        Self { components }
    }

    /// The root path `m`
    pub fn root() -> Self {
        Self::default()
    }

    /// Standard BIP-44 five-level path `m/44'/coin'/account'/change/index`
    pub fn bip44(coin_type: u32, account: u32, change: u32, index: u32) -> Result<Self, PathError> {
        Ok(Self::new(vec![
            DerivationComponent::hardened(bip_purposes::BIP44)?,
            DerivationComponent::hardened(coin_type)?,
            DerivationComponent::hardened(account)?,
            DerivationComponent::normal(change)?,
            DerivationComponent::normal(index)?,
        ]))
    }

    pub fn components(&self) -> &[DerivationComponent] {
        &self.components
    }

    /// Number of steps below the root
    pub fn depth(&self) -> usize {
        self.components.len()
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Non-fatal warnings about unusual but well-formed paths
    pub fn lint(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if let Some(purpose) = self.components.first() {
            if purpose.index != bip_purposes::BIP44 {
                warnings.push(format!(
                    "Non-standard purpose: {}. The derivation table uses BIP44",
                    purpose.index
                ));
            }
        }

        if self.components.iter().take(3).any(|c| !c.hardened) {
            warnings.push("Purpose, coin type, and account should be hardened (')".to_string());
        }

        if let Some(change) = self.components.get(3) {
            if change.index > 1 {
                warnings.push(format!(
                    "Non-standard change value: {}. Should be 0 (external) or 1 (internal)",
                    change.index
                ));
            }
        }

        warnings
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", ROOT)?;
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_path(s)
    }
}

/// Parse a derivation path string
pub fn parse_path(path: &str) -> Result<DerivationPath, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let mut parts = path.split('/');
    match parts.next() {
        Some(ROOT) => {}
        _ => return Err(PathError::MissingRoot),
    }

    let components = parts
        .enumerate()
        .map(|(position, part)| parse_component(position, part))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DerivationPath::new(components))
}

/// Parse a single path component
fn parse_component(position: usize, s: &str) -> Result<DerivationComponent, PathError> {
    if s.is_empty() {
        return Err(PathError::MalformedSeparator { position });
    }

    let (number_str, hardened) = match s.strip_suffix(&['\'', 'h', 'H'][..]) {
        Some(rest) => (rest, true),
        None => (s, false),
    };

    // `u32::from_str` tolerates a leading '+', the grammar does not
    if number_str.is_empty() || !number_str.bytes().all(|b| b.is_ascii_digit()) {
        return Err(PathError::NonNumeric {
            component: s.to_string(),
        });
    }

    number_str
        .parse::<u32>()
        .ok()
        .and_then(|index| DerivationComponent::new(index, hardened).ok())
        .ok_or_else(|| PathError::IndexOutOfRange {
            component: s.to_string(),
        })
}
