/*
 * Source Capability Table
 *
 * Declared capabilities of pipeline source types: whether a type can be
 * iterated, whether it can be constructed, and which element ordering its
 * iteration protocol guarantees. Replaces runtime instantiation/introspection
 * of candidate source types with a static lookup; unknown types fall back to
 * a conservative ordered default unless the strict policy is selected.
 */

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::shared::models::ElementOrdering;

/// Declared ordering characteristic of a source type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceOrdering {
    /// Iteration follows a defined encounter order
    Ordered,

    /// Iteration order is unspecified
    Unordered,

    /// The type declares no ordering characteristic
    Unknown,
}

impl SourceOrdering {
    /// Map to an element ordering, if determined
    pub fn as_element_ordering(self) -> Option<ElementOrdering> {
        match self {
            SourceOrdering::Ordered => Some(ElementOrdering::Ordered),
            SourceOrdering::Unordered => Some(ElementOrdering::Unordered),
            SourceOrdering::Unknown => None,
        }
    }
}

/// Capabilities of one source type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCapability {
    /// Ordering guaranteed by the type's iteration protocol
    pub ordering: SourceOrdering,

    /// Whether the type can be iterated at all
    pub iterable: bool,

    /// Whether the type can be constructed by client code
    pub instantiable: bool,
}

impl SourceCapability {
    /// An ordered, iterable, instantiable source
    pub fn ordered() -> Self {
        Self {
            ordering: SourceOrdering::Ordered,
            iterable: true,
            instantiable: true,
        }
    }

    /// An unordered, iterable, instantiable source
    pub fn unordered() -> Self {
        Self {
            ordering: SourceOrdering::Unordered,
            iterable: true,
            instantiable: true,
        }
    }

    /// A type that cannot be iterated
    pub fn non_iterable() -> Self {
        Self {
            ordering: SourceOrdering::Unknown,
            iterable: false,
            instantiable: true,
        }
    }

    /// Iterable type whose ordering characteristic is left to policy
    pub fn unspecified() -> Self {
        Self {
            ordering: SourceOrdering::Unknown,
            iterable: true,
            instantiable: true,
        }
    }

    /// Mark the type non-instantiable (interfaces, abstract types)
    pub fn non_instantiable(mut self) -> Self {
        self.instantiable = false;
        self
    }
}

/// Capability table keyed by source type name
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceTable {
    entries: FxHashMap<String, SourceCapability>,
}

impl SourceTable {
    /// Empty table
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Add or replace an entry
    pub fn insert(&mut self, ty: impl Into<String>, capability: SourceCapability) {
        self.entries.insert(ty.into(), capability);
    }

    /// Builder-style entry addition
    pub fn with(mut self, ty: impl Into<String>, capability: SourceCapability) -> Self {
        self.insert(ty, capability);
        self
    }

    /// Look up a source type
    pub fn lookup(&self, ty: &str) -> Option<SourceCapability> {
        self.entries.get(ty).copied()
    }

    /// Whether the table knows `ty`
    pub fn contains(&self, ty: &str) -> bool {
        self.entries.contains_key(ty)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Merge another table into this one (other wins on conflict)
    pub fn extend(&mut self, other: &SourceTable) {
        for (ty, cap) in &other.entries {
            self.entries.insert(ty.clone(), *cap);
        }
    }
}
