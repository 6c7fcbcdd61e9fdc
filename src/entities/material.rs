//! Material entity - BOM parts with their sourcing options

use serde::{Deserialize, Serialize};

use crate::core::identity::MaterialId;

/// Make or buy decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MakeBuy {
    /// Manufactured in-house
    Make,
    /// Procured from an outside supplier
    Buy,
}

impl std::fmt::Display for MakeBuy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MakeBuy::Make => write!(f, "MAKE"),
            MakeBuy::Buy => write!(f, "BUY"),
        }
    }
}

impl std::str::FromStr for MakeBuy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "make" => Ok(MakeBuy::Make),
            "buy" => Ok(MakeBuy::Buy),
            _ => Err(format!("Invalid make/buy value: {}. Use 'make' or 'buy'", s)),
        }
    }
}

/// Suppliers able to run one process for a material
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessSourcing {
    /// Process name (e.g. "SAND CAST", "BROUGHT OUT")
    #[serde(rename = "processType")]
    pub process_type: String,

    /// Supplier names in the order they were added, without duplicates
    #[serde(default)]
    pub suppliers: Vec<String>,
}

impl ProcessSourcing {
    pub fn new(process_type: impl Into<String>) -> Self {
        Self {
            process_type: process_type.into(),
            suppliers: Vec::new(),
        }
    }

    /// Add a supplier unless it is already listed. Returns true if added.
    pub fn add_supplier(&mut self, supplier: &str) -> bool {
        if self.has_supplier(supplier) {
            return false;
        }
        self.suppliers.push(supplier.to_string());
        true
    }

    pub fn has_supplier(&self, supplier: &str) -> bool {
        self.suppliers.iter().any(|s| s == supplier)
    }
}

/// A BOM part as seen by readers of the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Unique identifier
    pub id: MaterialId,

    /// Part name, used as the rate table key (not unique across the tree)
    pub name: String,

    /// Quantity per assembly
    pub qty: f64,

    /// Make or buy, if decided
    #[serde(rename = "type", default)]
    pub make_buy: Option<MakeBuy>,

    /// Sourcing options, one per process
    #[serde(default)]
    pub sourcing: Vec<ProcessSourcing>,

    /// Sub-assembly parts
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Material>,
}

impl Material {
    /// Find the sourcing entry for a process
    pub fn process(&self, process_type: &str) -> Option<&ProcessSourcing> {
        self.sourcing.iter().find(|p| p.process_type == process_type)
    }

    /// All (process, supplier) pairs this material can be sourced through
    pub fn sourcing_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sourcing.iter().flat_map(|p| {
            p.suppliers
                .iter()
                .map(move |s| (p.process_type.as_str(), s.as_str()))
        })
    }
}

/// Input for adding a material to the registry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewMaterial {
    /// Caller-chosen id; one is generated when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<MaterialId>,

    pub name: String,

    #[serde(default = "default_qty")]
    pub qty: f64,

    #[serde(rename = "type", default)]
    pub make_buy: Option<MakeBuy>,

    /// Initial sourcing; normalized on insert
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sourcing: Vec<ProcessSourcing>,

    /// Sub-assembly parts, added as children
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NewMaterial>,
}

fn default_qty() -> f64 {
    1.0
}

impl NewMaterial {
    pub fn new(name: impl Into<String>, qty: f64, make_buy: Option<MakeBuy>) -> Self {
        Self {
            id: None,
            name: name.into(),
            qty,
            make_buy,
            sourcing: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Use a caller-supplied id instead of a generated one
    pub fn with_id(mut self, id: impl Into<MaterialId>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Display node for the BOM tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomNode {
    pub label: String,
    pub key: String,
    pub qty: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BomNode>,
}
