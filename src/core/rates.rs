//! Rate table - supplier prices keyed by material, grade, size, process and supplier
//!
//! Storage is a fixed-depth nested map: material → sub-material → size → list of
//! [`RateEntry`]. A missing key at any level means "no data", never zero.
//! Within one cell the (process, supplier) pair is unique; [`RateTable::set_rate`]
//! is the only write path and always upserts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::entities::rate::{BulkRule, RateEntry};

/// Size label → entries
pub type SizeRates = BTreeMap<String, Vec<RateEntry>>;
/// Sub-material → sizes
pub type SubMaterialRates = BTreeMap<String, SizeRates>;

/// The price catalog
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RateTable {
    rates: BTreeMap<String, SubMaterialRates>,
}

impl RateTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the rate for one (material, grade, size, process, supplier) key
    ///
    /// Missing levels are created on demand. An existing entry for the same
    /// (process, supplier) pair in the cell is updated in place; otherwise a new
    /// entry is appended.
    pub fn set_rate(
        &mut self,
        material: &str,
        sub_material: &str,
        size: &str,
        process_type: &str,
        supplier: &str,
        rate: f64,
    ) {
        let sub_materials = self.rates.entry(material.to_string()).or_default();
        let sizes = sub_materials.entry(sub_material.to_string()).or_default();
        let entries = sizes.entry(size.to_string()).or_default();

        match entries.iter_mut().find(|e| e.matches(process_type, supplier)) {
            Some(existing) => {
                trace!(
                    material,
                    sub_material,
                    size,
                    process_type,
                    supplier,
                    old = existing.rate,
                    rate,
                    "updating rate"
                );
                existing.rate = rate;
            }
            None => {
                trace!(
                    material,
                    sub_material,
                    size,
                    process_type,
                    supplier,
                    rate,
                    "inserting rate"
                );
                entries.push(RateEntry::new(process_type, supplier, rate));
            }
        }
    }

    /// Write `rule.rate` to every size from `rule.from_size` through `rule.to_size`
    ///
    /// `sizes` gives the ordering of size labels. Nothing is written if either
    /// bound is not in `sizes` or the bounds are reversed. Returns the number of
    /// cells written.
    pub fn apply_bulk_rule(
        &mut self,
        material: &str,
        rule: &BulkRule,
        process_type: &str,
        supplier: &str,
        sizes: &[String],
    ) -> usize {
        let from = sizes.iter().position(|s| *s == rule.from_size);
        let to = sizes.iter().position(|s| *s == rule.to_size);
        let (Some(from), Some(to)) = (from, to) else {
            debug!(
                material,
                grade = %rule.material,
                from = %rule.from_size,
                to = %rule.to_size,
                "bulk rule bounds not in size list"
            );
            return 0;
        };
        if from > to {
            return 0;
        }

        for size in &sizes[from..=to] {
            self.set_rate(material, &rule.material, size, process_type, supplier, rule.rate);
        }
        debug!(material, grade = %rule.material, cells = to - from + 1, "applied bulk rule");
        to - from + 1
    }

    /// Entries at one cell, if the path exists
    pub fn cell(&self, material: &str, sub_material: &str, size: &str) -> Option<&[RateEntry]> {
        self.rates
            .get(material)?
            .get(sub_material)?
            .get(size)
            .map(Vec::as_slice)
    }

    /// All grades and sizes recorded under a material
    pub fn material(&self, material: &str) -> Option<&SubMaterialRates> {
        self.rates.get(material)
    }

    /// Material names, sorted
    pub fn materials(&self) -> impl Iterator<Item = &str> {
        self.rates.keys().map(String::as_str)
    }

    /// Grade names under a material, sorted
    pub fn sub_materials<'a>(&'a self, material: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.rates
            .get(material)
            .into_iter()
            .flat_map(|subs| subs.keys().map(String::as_str))
    }

    /// Size labels under a material and grade, sorted as strings
    pub fn sizes<'a>(
        &'a self,
        material: &str,
        sub_material: &str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.rates
            .get(material)
            .and_then(|subs| subs.get(sub_material))
            .into_iter()
            .flat_map(|sizes| sizes.keys().map(String::as_str))
    }

    /// Every entry with its cell key, in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, &str, &RateEntry)> {
        self.rates.iter().flat_map(|(material, subs)| {
            subs.iter().flat_map(move |(sub, sizes)| {
                sizes.iter().flat_map(move |(size, entries)| {
                    entries
                        .iter()
                        .map(move |e| (material.as_str(), sub.as_str(), size.as_str(), e))
                })
            })
        })
    }

    /// Total number of rate entries
    pub fn len(&self) -> usize {
        self.rates
            .values()
            .flat_map(|subs| subs.values())
            .flat_map(|sizes| sizes.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
