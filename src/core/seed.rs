//! Initial rate table construction from a sourcing catalog and base prices

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::error::CostingError;
use crate::core::rates::RateTable;

/// material → process → supplier names
pub type ValidCombos = BTreeMap<String, BTreeMap<String, Vec<String>>>;
/// material → applicable sub-material / grade names
pub type SubMaterialMap = BTreeMap<String, Vec<String>>;
/// material → sub-material → size → base rate
pub type BasePriceTable = BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>;

/// Multiplier applied to base rates of one process on one part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateAdjustment {
    pub material: String,
    pub process: String,
    pub factor: f64,
}

/// Investment casting a valve body costs half again as much as the base rate
pub fn default_adjustments() -> Vec<RateAdjustment> {
    vec![RateAdjustment {
        material: "BODY".to_string(),
        process: "INVESTMENT CASTING".to_string(),
        factor: 1.5,
    }]
}

/// Everything needed to seed a rate table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeedCatalog {
    /// Valid (process, supplier) combinations per part
    #[serde(default)]
    pub valid_combos: ValidCombos,

    /// Grades applicable to each part
    #[serde(default)]
    pub sub_materials: SubMaterialMap,

    /// Base prices per part, grade and size
    #[serde(default)]
    pub base_prices: BasePriceTable,

    /// Process surcharges; the built-in set when omitted
    #[serde(default = "default_adjustments")]
    pub adjustments: Vec<RateAdjustment>,
}

impl SeedCatalog {
    /// Check values a rate table must never hold
    pub fn validate(&self) -> Result<(), CostingError> {
        for (material, subs) in &self.base_prices {
            for (sub_material, sizes) in subs {
                for (size, rate) in sizes {
                    if !rate.is_finite() || *rate < 0.0 {
                        return Err(CostingError::InvalidRate {
                            key: format!("{}/{}/{}", material, sub_material, size),
                            rate: *rate,
                        });
                    }
                }
            }
        }
        for adj in &self.adjustments {
            if !adj.factor.is_finite() || adj.factor < 0.0 {
                return Err(CostingError::InvalidAdjustment {
                    material: adj.material.clone(),
                    process: adj.process.clone(),
                    factor: adj.factor,
                });
            }
        }
        Ok(())
    }

    /// Build the initial rate table from this catalog
    pub fn build_rates(&self) -> RateTable {
        build_initial_rates(
            &self.valid_combos,
            &self.sub_materials,
            &self.base_prices,
            &self.adjustments,
        )
    }
}

/// Combined multiplier for a (part, process) pair
fn adjustment_factor(adjustments: &[RateAdjustment], material: &str, process: &str) -> f64 {
    adjustments
        .iter()
        .filter(|a| a.material == material && a.process == process)
        .map(|a| a.factor)
        .product()
}

/// Fold the catalog into a rate table
///
/// For each part, each process and supplier it may be sourced through, each
/// grade listed for the part, and each size with a base price for that
/// (part, grade), one entry is written with the base rate times the
/// (part, process) adjustment. Grades without base prices contribute nothing.
/// Entries go through [`RateTable::set_rate`], so repeated suppliers in the
/// input cannot produce duplicate entries.
pub fn build_initial_rates(
    valid_combos: &ValidCombos,
    sub_materials: &SubMaterialMap,
    base_prices: &BasePriceTable,
    adjustments: &[RateAdjustment],
) -> RateTable {
    let mut table = RateTable::new();

    for (material, processes) in valid_combos {
        let Some(grades) = sub_materials.get(material) else {
            debug!(material, "no grades listed, skipping");
            continue;
        };
        let Some(priced_grades) = base_prices.get(material) else {
            debug!(material, "no base prices, skipping");
            continue;
        };

        for (process, suppliers) in processes {
            let factor = adjustment_factor(adjustments, material, process);
            for supplier in suppliers {
                for grade in grades {
                    let Some(sizes) = priced_grades.get(grade) else {
                        continue;
                    };
                    for (size, base_rate) in sizes {
                        let rate = base_rate * factor;
                        table.set_rate(material, grade, size, process, supplier, rate);
                    }
                }
            }
        }
    }

    debug!(entries = table.len(), "seeded rate table");
    table
}
