//! Path Table
//!
//! Immutable-by-convention mapping of algorithm to derivation path text,
//! passed into the orchestrator at call time. Declaration order is the
//! output order, so entries are kept in a `Vec`, not a hash map.
//!
//! Path text is stored verbatim; grammar is enforced when a path is walked.

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{SeedError, SeedResult};
use crate::types::Algorithm;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathTable {
    entries: Vec<(Algorithm, String)>,
}

impl PathTable {
    /// Table with no entries
    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    /// Standard table: every algorithm at `m/44'/<coin>'/0'/0/0`
    pub fn standard() -> Self {
        Self {
            entries: Algorithm::ALL
                .iter()
                .map(|a| (*a, a.standard_path().to_string()))
                .collect(),
        }
    }

    /// Append an entry. Each algorithm may appear once.
    pub fn insert(&mut self, algorithm: Algorithm, path: impl Into<String>) -> SeedResult<()> {
        if self.get(algorithm).is_some() {
            return Err(SeedError::config_error(format!(
                "duplicate path table entry for '{}'",
                algorithm
            )));
        }
        self.entries.push((algorithm, path.into()));
        Ok(())
    }

    /// Replace an algorithm's path in place, or append it if absent
    pub fn with_path(mut self, algorithm: Algorithm, path: impl Into<String>) -> Self {
        let path = path.into();
        match self.entries.iter_mut().find(|(a, _)| *a == algorithm) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((algorithm, path)),
        }
        self
    }

    /// Keep only the requested algorithms, in table order
    pub fn select(&self, algorithms: &[Algorithm]) -> SeedResult<Self> {
        if let Some(missing) = algorithms.iter().find(|a| self.get(**a).is_none()) {
            return Err(SeedError::config_error(format!(
                "algorithm '{}' is not in the path table",
                missing
            )));
        }

        Ok(Self {
            entries: self
                .entries
                .iter()
                .filter(|(a, _)| algorithms.contains(a))
                .cloned()
                .collect(),
        })
    }

    pub fn get(&self, algorithm: Algorithm) -> Option<&str> {
        self.entries
            .iter()
            .find(|(a, _)| *a == algorithm)
            .map(|(_, p)| p.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Algorithm, &str)> {
        self.entries.iter().map(|(a, p)| (*a, p.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PathTable {
    fn default() -> Self {
        Self::standard()
    }
}

impl Serialize for PathTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (algorithm, path) in &self.entries {
            map.serialize_entry(algorithm.id(), path)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PathTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = PathTable;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of algorithm id to derivation path")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PathTable, A::Error> {
                let mut table = PathTable::empty();
                while let Some((id, path)) = access.next_entry::<String, String>()? {
                    let algorithm: Algorithm = id.parse().map_err(serde::de::Error::custom)?;
                    table.insert(algorithm, path).map_err(serde::de::Error::custom)?;
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}
