//! CLI command implementations.

pub mod common;
pub mod convert;
pub mod mask;
pub mod reckon;
pub mod transform;
pub mod version;
