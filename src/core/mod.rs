//! Core module - the costing data model and its algorithms

pub mod config;
pub mod consistency;
pub mod error;
pub mod identity;
pub mod loader;
pub mod rates;
pub mod registry;
pub mod resolver;
pub mod seed;
pub mod session;

pub use config::Config;
pub use consistency::{ComboRef, ConsistencyReport};
pub use error::CostingError;
pub use identity::MaterialId;
pub use rates::RateTable;
pub use registry::{MaterialRef, SourcingRegistry};
pub use resolver::RateResolver;
pub use seed::{build_initial_rates, RateAdjustment, SeedCatalog};
pub use session::CostingSession;
