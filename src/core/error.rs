//! Errors raised while acquiring costing inputs
//!
//! The registry, rate table and resolver never fail; these errors come only
//! from reading catalog, BOM and override files.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use crate::yaml::diagnostics::YamlParseError;

#[derive(Debug, Error, Diagnostic)]
pub enum CostingError {
    #[error("cannot read {path:?}: {source}")]
    #[diagnostic(code(costing::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Yaml(#[from] YamlParseError),

    #[error("rate override file {path:?}, row {row}: {message}")]
    #[diagnostic(
        code(costing::overrides),
        help("expected columns: material,sub_material,size,process,supplier,rate")
    )]
    Override {
        path: PathBuf,
        row: usize,
        message: String,
    },

    #[error("invalid rate {rate} at {key}")]
    #[diagnostic(code(costing::rate), help("rates must be finite and not negative"))]
    InvalidRate { key: String, rate: f64 },

    #[error("invalid adjustment factor {factor} for {material} / {process}")]
    #[diagnostic(code(costing::adjustment))]
    InvalidAdjustment {
        material: String,
        process: String,
        factor: f64,
    },

    #[error("invalid quantity {qty} for material '{name}'")]
    #[diagnostic(code(costing::qty), help("quantities must be greater than zero"))]
    InvalidQty { name: String, qty: f64 },

    #[error("invalid list-price factor {0}")]
    #[diagnostic(code(costing::config))]
    InvalidLpFactor(String),
}

impl CostingError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CostingError::Io {
            path: path.into(),
            source,
        }
    }
}
