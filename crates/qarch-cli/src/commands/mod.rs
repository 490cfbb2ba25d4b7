//! CLI command implementations.

pub mod build;
pub mod common;
pub mod gates;
pub mod run;
pub mod version;
