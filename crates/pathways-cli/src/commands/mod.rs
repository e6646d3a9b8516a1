//! CLI command implementations.

pub mod common;
pub mod evaluate;
pub mod grid;
pub mod scale;
pub mod spectrum;
pub mod sweep;
pub mod version;
