//! HTTP repositories for the discovery service.
//!
//! Consumes the remote service as plain HTTP+JSON:
//! - `GET /categories` → array of [`Category`](nearby_core::Category)
//! - `GET /markets/category/{categoryId}` → array of [`Place`](nearby_core::Place)
//!
//! Each repository is a trait so the discovery controller can be driven by
//! in-memory implementations in tests.

pub mod categories;
pub mod client;
pub mod error;
pub mod places;

pub use categories::{CategoryRepository, HttpCategoryRepository};
pub use client::ApiClient;
pub use error::{ApiError, ApiResult, FetchError, FetchErrorKind, FetchResult, Resource};
pub use places::{HttpPlaceRepository, PlaceRepository};
