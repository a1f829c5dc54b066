//! CLI command implementations.

pub mod inspect;
pub mod preset;
pub mod process;
