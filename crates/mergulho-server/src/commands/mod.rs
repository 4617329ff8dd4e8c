//! Subcommand implementations.

pub mod convert;
pub mod import;
pub mod serve;
