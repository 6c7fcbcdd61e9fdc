//! Entity type definitions
//!
//! - [`Material`] - BOM parts (make/buy) with their process and supplier options
//! - [`RateEntry`] - a supplier's price for running a process on one part/grade/size
//! - [`ProductConfig`] - the product and sizes being costed

pub mod material;
pub mod product;
pub mod rate;

pub use material::{BomNode, MakeBuy, Material, NewMaterial, ProcessSourcing};
pub use product::ProductConfig;
pub use rate::{BulkRule, RateEntry, RateUnit};
