//! Material identity using prefixed ULIDs

use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

/// Prefix carried by every generated material id
pub const MATERIAL_PREFIX: &str = "MAT";

/// Opaque material identifier
///
/// Generated ids look like `MAT-01HQ3K4N5M6P7R8S9T0UVWXYZ`. Ids supplied by a
/// caller are kept verbatim and never parsed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MaterialId(String);

impl MaterialId {
    /// Create a new random id
    pub fn generate() -> Self {
        Self(format!("{}-{}", MATERIAL_PREFIX, Ulid::new()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True if this id was produced by [`MaterialId::generate`]
    pub fn is_generated(&self) -> bool {
        self.0
            .split_once('-')
            .map(|(prefix, ulid)| prefix == MATERIAL_PREFIX && Ulid::from_string(ulid).is_ok())
            .unwrap_or(false)
    }
}

impl fmt::Display for MaterialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MaterialId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for MaterialId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl AsRef<str> for MaterialId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
