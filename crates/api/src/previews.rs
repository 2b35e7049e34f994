//! In-memory preview store for uploaded images.
//!
//! Accepted image uploads keep their bytes here so the form can render a
//! thumbnail through `/api/uploads/{id}/preview`. Entries are released when
//! the file is removed or replaced and when its session is completed or
//! abandoned.
//!
//! Nothing here survives a restart. A stored session whose previews are no
//! longer held is served without `previewUrl` on those files.

use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Bytes and content type of one preview.
#[derive(Debug, Clone)]
pub struct Preview {
    pub content_type: String,
    pub bytes: Bytes,
}

#[derive(Debug, Default)]
pub struct PreviewCache {
    entries: RwLock<HashMap<Uuid, Preview>>,
}

impl PreviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Public URL the preview is served from.
    pub fn url_for(id: Uuid) -> String {
        format!("/api/uploads/{id}/preview")
    }

    pub async fn insert(&self, id: Uuid, content_type: impl Into<String>, bytes: Bytes) {
        self.entries.write().await.insert(
            id,
            Preview {
                content_type: content_type.into(),
                bytes,
            },
        );
    }

    pub async fn get(&self, id: Uuid) -> Option<Preview> {
        self.entries.read().await.get(&id).cloned()
    }

    /// The subset of `ids` that currently has a preview.
    pub async fn held(&self, ids: impl IntoIterator<Item = Uuid>) -> HashSet<Uuid> {
        let entries = self.entries.read().await;
        ids.into_iter().filter(|id| entries.contains_key(id)).collect()
    }

    /// Release a preview. Returns whether one was held.
    pub async fn release(&self, id: Uuid) -> bool {
        self.entries.write().await.remove(&id).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}
