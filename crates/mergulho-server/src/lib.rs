//! mergulho-server - HTTP API and data tools for Mergulho Virtual.
//!
//! The `mergulho` binary serves the sightings and telemetry listings over
//! HTTP (JSON or HTML) and carries the offline import and conversion
//! commands that load those collections.

pub mod convert;
pub mod import;
pub mod server;
pub mod store;
