//! Product configuration - which valve and sizes are being costed

use serde::{Deserialize, Serialize};

/// Costing session settings chosen by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Product being costed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,

    /// Sizes shown in rate tables, in display order
    #[serde(default, rename = "selectedSizes")]
    pub selected_sizes: Vec<String>,

    /// List-price multiplier applied on top of supplier rates
    #[serde(default = "default_lp_factor", rename = "lpFactor")]
    pub lp_factor: f64,
}

fn default_lp_factor() -> f64 {
    1.0
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            product: None,
            selected_sizes: Vec::new(),
            lp_factor: default_lp_factor(),
        }
    }
}

impl ProductConfig {
    pub fn set_product(&mut self, name: Option<String>) {
        self.product = name;
    }

    pub fn set_sizes(&mut self, sizes: Vec<String>) {
        self.selected_sizes = sizes;
    }

    pub fn set_lp_factor(&mut self, factor: f64) {
        self.lp_factor = factor;
    }

    /// Scale a supplier rate to a list price
    pub fn list_price(&self, rate: f64) -> f64 {
        rate * self.lp_factor
    }
}
