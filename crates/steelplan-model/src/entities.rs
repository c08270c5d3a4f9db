use indexmap::IndexMap;

/// A raw-ore supplier.
///
/// Identifiers are plain strings held by the owning collection; renaming a
/// mine replaces its key. Ore types form an open string set shared with
/// [`Blend::parts`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Mine {
    /// Ore type this mine produces (e.g. "A")
    pub ore_type: String,
    /// Purchase cost per ton of ore
    pub purchase_cost: f64,
    /// Freight cost per ton, keyed by plant
    pub ship_cost: IndexMap<String, f64>,
    /// Maximum total tonnage this mine can source
    pub limit: f64,
}

/// A processing plant that blends ore into finished steel.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Plant {
    /// Maximum total ore intake in tons
    pub capacity: f64,
    /// Processing cost per ton of finished steel, keyed by grade
    pub process_cost: IndexMap<String, f64>,
}

/// Required relative parts of each ore type for one steel grade.
///
/// Parts need not sum to any fixed total, but a blend whose parts sum to
/// zero cannot be formulated and is rejected at build time.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Blend {
    /// Ore type -> nonnegative part count
    pub parts: IndexMap<String, f64>,
}

impl Blend {
    /// Blend from (ore type, parts) pairs.
    pub fn of<const N: usize>(parts: [(&str, f64); N]) -> Self {
        Self {
            parts: parts.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
        }
    }

    pub fn total_parts(&self) -> f64 {
        self.parts.values().sum()
    }
}

/// A destination market with an exact per-grade demand.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Country {
    /// Grade -> tons that must be delivered exactly
    pub demand: IndexMap<String, f64>,
    /// Plant -> grade -> freight cost per ton of finished steel
    pub ship_cost: IndexMap<String, IndexMap<String, f64>>,
}

/// Ordered string-keyed map from (key, value) pairs.
pub(crate) fn costs<const N: usize>(entries: [(&str, f64); N]) -> IndexMap<String, f64> {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}
