//! Read-only rate queries

use std::cmp::Ordering;

use crate::core::rates::RateTable;
use crate::entities::rate::RateEntry;

/// Query layer over a [`RateTable`]
///
/// Holds a shared borrow, so it can never mutate the table. It keeps no state
/// of its own; callers that repeat [`RateResolver::has_rates_for_combo`] for one
/// material may cache the answer themselves.
#[derive(Debug, Clone, Copy)]
pub struct RateResolver<'a> {
    table: &'a RateTable,
}

impl<'a> RateResolver<'a> {
    pub fn new(table: &'a RateTable) -> Self {
        Self { table }
    }

    /// Entries at (material, sub-material, size); empty if any level is missing
    pub fn entries_for_cell(
        &self,
        material: &str,
        sub_material: &str,
        size: &str,
    ) -> &'a [RateEntry] {
        self.table.cell(material, sub_material, size).unwrap_or(&[])
    }

    /// Rate for the full five-part key, or `None` when no such entry exists
    pub fn rate(
        &self,
        material: &str,
        sub_material: &str,
        size: &str,
        process_type: &str,
        supplier: &str,
    ) -> Option<f64> {
        self.table
            .cell(material, sub_material, size)?
            .iter()
            .find(|e| e.matches(process_type, supplier))
            .map(|e| e.rate)
    }

    /// True if any grade and size under `material` has a rate for (process, supplier)
    ///
    /// Scans every cell under the material.
    pub fn has_rates_for_combo(&self, material: &str, process_type: &str, supplier: &str) -> bool {
        let Some(sub_materials) = self.table.material(material) else {
            return false;
        };
        sub_materials
            .values()
            .flat_map(|sizes| sizes.values())
            .any(|entries| entries.iter().any(|e| e.matches(process_type, supplier)))
    }

    /// Lowest quoted entry in a cell, first listed wins ties
    pub fn cheapest(
        &self,
        material: &str,
        sub_material: &str,
        size: &str,
    ) -> Option<&'a RateEntry> {
        self.entries_for_cell(material, sub_material, size)
            .iter()
            .min_by(|a, b| a.rate.partial_cmp(&b.rate).unwrap_or(Ordering::Equal))
    }
}
