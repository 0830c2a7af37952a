//! CLI command implementations.

pub mod common;
pub mod config;
pub mod index;
pub mod invert;
pub mod ranges;
pub mod tile;
pub mod weeks;
