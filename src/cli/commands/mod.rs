//! Command implementations

pub mod bom;
pub mod check;
pub mod rate;
