//! Per-invocation costing state built from config, files and flags

use miette::Result;
use tracing::debug;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::loader;
use crate::core::{Config, RateResolver, RateTable, SourcingRegistry};
use crate::entities::ProductConfig;

/// Registry, seeded rate table and product settings for one command
#[derive(Debug)]
pub struct CostingContext {
    pub registry: SourcingRegistry,
    pub rates: RateTable,
    pub product: ProductConfig,
    pub format: OutputFormat,
}

impl CostingContext {
    /// Load config, seed the rate table, apply overrides and build the registry
    pub fn load(global: &GlobalOpts) -> Result<Self> {
        let mut config = Config::load();
        if global.lp_factor.is_some() {
            config.lp_factor = global.lp_factor;
        }
        Self::from_config(global, &config)
    }

    pub fn from_config(global: &GlobalOpts, config: &Config) -> Result<Self> {
        let catalog_path = global.catalog.as_deref().or(config.catalog.as_deref());
        let catalog = loader::load_catalog(catalog_path)?;
        let mut rates = catalog.build_rates();

        if let Some(ref path) = global.overrides {
            let overrides = loader::load_overrides(path)?;
            loader::apply_overrides(&mut rates, &overrides);
        }

        let bom_path = global.bom.as_deref().or(config.bom.as_deref());
        let registry = SourcingRegistry::with_materials(loader::load_bom(bom_path)?);

        let mut product = ProductConfig::default();
        product.set_lp_factor(config.lp_factor()?);

        let format = match global.format {
            OutputFormat::Auto => config
                .default_format
                .as_deref()
                .and_then(OutputFormat::from_config)
                .unwrap_or(OutputFormat::Auto),
            f => f,
        };

        debug!(
            materials = registry.len(),
            rates = rates.len(),
            lp_factor = product.lp_factor,
            "costing context ready"
        );

        Ok(Self {
            registry,
            rates,
            product,
            format,
        })
    }

    pub fn resolver(&self) -> RateResolver<'_> {
        RateResolver::new(&self.rates)
    }
}
