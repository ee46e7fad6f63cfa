//! Shared helpers for nearby-api integration tests.

pub mod mock_api;
