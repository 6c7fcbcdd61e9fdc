//! Cross-check between the sourcing registry and the rate table
//!
//! The two structures are owned separately and neither write path consults
//! the other, so they can drift apart: a price for a supplier the part is not
//! sourced from, or a sourcing option nobody has priced. This pass reports
//! both directions without changing either structure. Parts are matched by
//! name, the same key the rate table uses.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::core::rates::RateTable;
use crate::core::registry::SourcingRegistry;

/// One (material, process, supplier) combination
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct ComboRef {
    pub material: String,
    pub process: String,
    pub supplier: String,
}

impl std::fmt::Display for ComboRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {} / {}", self.material, self.process, self.supplier)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsistencyReport {
    /// Priced in the rate table but not a sourcing option of any part with that name
    pub unsourced_rates: Vec<ComboRef>,
    /// Sourcing options with no rate under any grade or size
    pub unpriced_sourcing: Vec<ComboRef>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.unsourced_rates.is_empty() && self.unpriced_sourcing.is_empty()
    }
}

type ComboSet<'a> = BTreeMap<&'a str, BTreeSet<(&'a str, &'a str)>>;

/// Compare the registry's sourcing options with the priced combinations
pub fn check(registry: &SourcingRegistry, table: &RateTable) -> ConsistencyReport {
    let mut sourced: ComboSet<'_> = BTreeMap::new();
    for material in registry.iter() {
        sourced
            .entry(material.name)
            .or_default()
            .extend(material.sourcing_pairs());
    }

    let mut priced: ComboSet<'_> = BTreeMap::new();
    for (material, _, _, entry) in table.iter() {
        priced
            .entry(material)
            .or_default()
            .insert((entry.process_type.as_str(), entry.supplier.as_str()));
    }

    ConsistencyReport {
        unsourced_rates: difference(&priced, &sourced),
        unpriced_sourcing: difference(&sourced, &priced),
    }
}

/// Combos in `left` that `right` lacks, sorted
fn difference(left: &ComboSet<'_>, right: &ComboSet<'_>) -> Vec<ComboRef> {
    let empty = BTreeSet::new();
    left.iter()
        .flat_map(|(material, pairs)| {
            let other = right.get(material).unwrap_or(&empty);
            pairs
                .difference(other)
                .map(move |(process, supplier)| ComboRef {
                    material: material.to_string(),
                    process: process.to_string(),
                    supplier: supplier.to_string(),
                })
        })
        .collect()
}
