//! Core domain types for nearby place discovery.
//!
//! This crate provides the types shared by every other crate in the workspace:
//! - `CategoryId`, `PlaceId`: Non-empty identifiers issued by the remote service
//! - `Category`: A tag used to filter places (e.g., "restaurant")
//! - `Place`: A point of interest ("market") with optional coordinates
//! - `Coordinate`, `LocationFix`: Validated WGS-84 positions
//! - `BoxFuture`: Return type for async methods on collaborator traits

pub mod category;
pub mod error;
pub mod future;
pub mod geo;
pub mod id;
pub mod place;

pub use category::Category;
pub use error::{CoreError, Result};
pub use future::BoxFuture;
pub use geo::{Coordinate, LocationFix};
pub use id::{CategoryId, PlaceId};
pub use place::Place;
