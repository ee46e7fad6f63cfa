//! Category repository.

use std::sync::Arc;

use nearby_core::{BoxFuture, Category};
use tracing::info;

use crate::client::ApiClient;
use crate::error::{FetchResult, Resource};

/// Source of the category taxonomy.
pub trait CategoryRepository: Send + Sync {
    /// Fetch all categories in server-defined order.
    fn list_categories(&self) -> BoxFuture<'_, FetchResult<Vec<Category>>>;
}

/// `GET /categories`.
#[derive(Debug, Clone)]
pub struct HttpCategoryRepository {
    client: Arc<ApiClient>,
}

impl HttpCategoryRepository {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

impl CategoryRepository for HttpCategoryRepository {
    fn list_categories(&self) -> BoxFuture<'_, FetchResult<Vec<Category>>> {
        Box::pin(async move {
            let categories: Vec<Category> = self
                .client
                .get_json(Resource::Categories, &["categories"])
                .await?;

            info!(count = categories.len(), "Categories fetched");
            Ok(categories)
        })
    }
}
