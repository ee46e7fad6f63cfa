//! Integration tests for nearby-app.
//!
//! These tests drive complete sessions against a local HTTP fixture:
//! - Initial load and auto-selection
//! - Scripted category changes and detail navigation
//! - Location and service failures

pub mod common;
