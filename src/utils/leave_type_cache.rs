use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

use crate::model::leave_request::LeaveType;

/// Leave types rarely change, so they are kept per API server for a while.
///
/// Clones share the same underlying cache.
#[derive(Clone)]
pub struct LeaveTypeCache {
    inner: Cache<String, Arc<Vec<LeaveType>>>,
}

impl LeaveTypeCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder()
                .max_capacity(64) // one entry per API server
                .time_to_live(ttl)
                .build(),
        }
    }

    pub async fn get(&self, base_url: &str) -> Option<Arc<Vec<LeaveType>>> {
        self.inner.get(base_url).await
    }

    pub async fn put(&self, base_url: &str, types: Vec<LeaveType>) -> Arc<Vec<LeaveType>> {
        let types = Arc::new(types);
        self.inner
            .insert(base_url.to_string(), types.clone())
            .await;
        types
    }

    pub fn clear(&self) {
        self.inner.invalidate_all();
    }
}

impl Default for LeaveTypeCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(3600))
    }
}
