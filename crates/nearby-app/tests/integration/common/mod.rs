//! Common test utilities.

pub mod fixture_api;
