//! Place repository.

use std::sync::Arc;

use nearby_core::{BoxFuture, CategoryId, Place};
use tracing::info;

use crate::client::ApiClient;
use crate::error::{FetchResult, Resource};

/// Source of category-scoped place listings.
///
/// Takes a [`CategoryId`], which is never empty: "no category selected yet"
/// is handled by the caller skipping the call entirely.
pub trait PlaceRepository: Send + Sync {
    /// Fetch every place the server files under `category`.
    fn list_places<'a>(&'a self, category: &'a CategoryId)
        -> BoxFuture<'a, FetchResult<Vec<Place>>>;
}

/// `GET /markets/category/{categoryId}`.
#[derive(Debug, Clone)]
pub struct HttpPlaceRepository {
    client: Arc<ApiClient>,
}

impl HttpPlaceRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl PlaceRepository for HttpPlaceRepository {
    fn list_places<'a>(
        &'a self,
        category: &'a CategoryId,
    ) -> BoxFuture<'a, FetchResult<Vec<Place>>> {
        Box::pin(async move {
            let places: Vec<Place> = self
                .client
                .get_json(
                    Resource::Places,
                    &["markets", "category", category.as_str()],
                )
                .await?;

            info!(%category, count = places.len(), "Places fetched");
            Ok(places)
        })
    }
}
