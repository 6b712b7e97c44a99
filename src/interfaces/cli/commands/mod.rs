//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod catalog;
mod config_gen;
mod links;
mod users;

pub use catalog::*;
pub use config_gen::*;
pub use links::*;
pub use users::*;
