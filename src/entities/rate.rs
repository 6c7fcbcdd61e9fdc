//! Rate types - supplier quotes for one rate table cell

use serde::{Deserialize, Serialize};

use crate::entities::material::MakeBuy;

/// Quoted unit price for a supplier running a process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub supplier: String,

    #[serde(rename = "processType")]
    pub process_type: String,

    /// Non-negative price, currency implicit
    pub rate: f64,
}

impl RateEntry {
    pub fn new(process_type: impl Into<String>, supplier: impl Into<String>, rate: f64) -> Self {
        Self {
            supplier: supplier.into(),
            process_type: process_type.into(),
            rate,
        }
    }

    /// True if this entry is keyed by the given (process, supplier) pair
    pub fn matches(&self, process_type: &str, supplier: &str) -> bool {
        self.process_type == process_type && self.supplier == supplier
    }
}

/// Unit a rate is quoted in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RateUnit {
    PerKg,
    PerUnit,
}

impl RateUnit {
    /// Bought-out parts are priced per piece; castings and other made parts by weight
    pub fn for_make_buy(make_buy: Option<MakeBuy>) -> Self {
        match make_buy {
            Some(MakeBuy::Buy) => RateUnit::PerUnit,
            Some(MakeBuy::Make) | None => RateUnit::PerKg,
        }
    }
}

impl std::fmt::Display for RateUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateUnit::PerKg => write!(f, "per Kg"),
            RateUnit::PerUnit => write!(f, "per Unit"),
        }
    }
}

/// Fill one rate across a contiguous size range of a grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkRule {
    /// Sub-material / grade the rule applies to
    pub material: String,
    pub rate: f64,
    #[serde(rename = "fromSize")]
    pub from_size: String,
    #[serde(rename = "toSize")]
    pub to_size: String,
}
