//! YAML input helpers

pub mod diagnostics;

pub use diagnostics::YamlParseError;
