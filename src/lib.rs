//! Valve costing toolkit
//!
//! Tracks the bill of materials of a valve assembly, the process and supplier
//! options each part can be sourced through, and the supplier rates for every
//! part, grade, size, process and supplier.

pub mod cli;
pub mod core;
pub mod entities;
pub mod yaml;
