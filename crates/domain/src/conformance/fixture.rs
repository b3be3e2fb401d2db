//! Per-case key/value fixtures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A key and the value stored under it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct KeyPair {
    /// The key.
    pub key: String,
    /// The value.
    pub value: String,
}

impl KeyPair {
    /// Creates a pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Immutable, freshly generated identity for one case execution.
///
/// Every case gets its own fixture so no two cases in a run ever touch the
/// same generated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseFixture {
    id: Uuid,
    pair: KeyPair,
}

impl CaseFixture {
    /// Generates a fixture from a random (v4) identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self::from_id(Uuid::new_v4())
    }

    /// Builds the fixture for a known identifier.
    #[must_use]
    pub fn from_id(id: Uuid) -> Self {
        Self {
            id,
            pair: KeyPair::new(format!("{id}-key"), format!("{id}-value")),
        }
    }

    /// The identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// `<id>-key`
    #[must_use]
    pub fn key(&self) -> &str {
        &self.pair.key
    }

    /// `<id>-value`
    #[must_use]
    pub fn value(&self) -> &str {
        &self.pair.value
    }

    /// The generated pair.
    #[must_use]
    pub const fn pair(&self) -> &KeyPair {
        &self.pair
    }
}
