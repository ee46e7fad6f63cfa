//! Category taxonomy.

use crate::id::CategoryId;
use serde::{Deserialize, Serialize};

/// A user-facing tag used to filter places (e.g., "restaurant").
///
/// Identity is `id`; the icon is opaque to the discovery flow and only
/// forwarded to the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, alias = "icon")]
    pub icon_url: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            icon_url: String::new(),
        }
    }
}
