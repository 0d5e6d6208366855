//! CLI command implementations.

pub mod batch;
pub mod common;
pub mod run;
pub mod version;
