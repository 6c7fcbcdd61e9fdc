//! Input loading utilities
//!
//! Reads the seed catalog, the default BOM and rate overrides. The embedded
//! demo copies under `data/` stand in when no file is given.

use std::fs;
use std::path::Path;

use rust_embed::Embed;
use serde::Deserialize;
use tracing::debug;

use crate::core::error::CostingError;
use crate::core::rates::RateTable;
use crate::core::seed::SeedCatalog;
use crate::entities::material::NewMaterial;
use crate::yaml::diagnostics::YamlParseError;

#[derive(Embed)]
#[folder = "data/"]
struct DemoData;

const DEMO_CATALOG: &str = "demo_catalog.yaml";
const DEMO_BOM: &str = "default_bom.yaml";

/// One row of a rate override CSV
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateOverride {
    pub material: String,
    pub sub_material: String,
    pub size: String,
    pub process: String,
    pub supplier: String,
    pub rate: f64,
}

fn embedded(name: &str) -> String {
    DemoData::get(name)
        .map(|file| String::from_utf8_lossy(&file.data).into_owned())
        .unwrap_or_default()
}

fn read(path: &Path) -> Result<String, CostingError> {
    fs::read_to_string(path).map_err(|e| CostingError::io(path, e))
}

/// Parse a seed catalog document
pub fn parse_catalog(source: &str, filename: &str) -> Result<SeedCatalog, CostingError> {
    let catalog: SeedCatalog = serde_yml::from_str(source)
        .map_err(|e| YamlParseError::from_serde_error(&e, source, filename, "catalog"))?;
    catalog.validate()?;
    Ok(catalog)
}

/// Load the seed catalog from `path`, or the embedded demo catalog
pub fn load_catalog(path: Option<&Path>) -> Result<SeedCatalog, CostingError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading catalog");
            parse_catalog(&read(path)?, &path.display().to_string())
        }
        None => parse_catalog(&embedded(DEMO_CATALOG), DEMO_CATALOG),
    }
}

/// Parse a BOM document: a list of materials, optionally nested
pub fn parse_bom(source: &str, filename: &str) -> Result<Vec<NewMaterial>, CostingError> {
    let materials: Vec<NewMaterial> = serde_yml::from_str(source)
        .map_err(|e| YamlParseError::from_serde_error(&e, source, filename, "BOM"))?;
    check_quantities(&materials)?;
    Ok(materials)
}

fn check_quantities(materials: &[NewMaterial]) -> Result<(), CostingError> {
    for m in materials {
        if !m.qty.is_finite() || m.qty <= 0.0 {
            return Err(CostingError::InvalidQty {
                name: m.name.clone(),
                qty: m.qty,
            });
        }
        check_quantities(&m.children)?;
    }
    Ok(())
}

/// Load the BOM from `path`, or the embedded default BOM
pub fn load_bom(path: Option<&Path>) -> Result<Vec<NewMaterial>, CostingError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "loading BOM");
            parse_bom(&read(path)?, &path.display().to_string())
        }
        None => parse_bom(&embedded(DEMO_BOM), DEMO_BOM),
    }
}

/// Read rate overrides from CSV with a header row
pub fn load_overrides(path: &Path) -> Result<Vec<RateOverride>, CostingError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| CostingError::Override {
            path: path.to_path_buf(),
            row: 0,
            message: e.to_string(),
        })?;

    let mut overrides = Vec::new();
    for (idx, record) in reader.deserialize::<RateOverride>().enumerate() {
        let row = idx + 2; // 1-indexed, after the header
        let record = record.map_err(|e| CostingError::Override {
            path: path.to_path_buf(),
            row,
            message: e.to_string(),
        })?;
        if !record.rate.is_finite() || record.rate < 0.0 {
            return Err(CostingError::Override {
                path: path.to_path_buf(),
                row,
                message: format!("rate must not be negative, got {}", record.rate),
            });
        }
        overrides.push(record);
    }
    Ok(overrides)
}

/// Upsert each override into the table
pub fn apply_overrides(table: &mut RateTable, overrides: &[RateOverride]) {
    for o in overrides {
        table.set_rate(&o.material, &o.sub_material, &o.size, &o.process, &o.supplier, o.rate);
    }
    debug!(count = overrides.len(), "applied rate overrides");
}
