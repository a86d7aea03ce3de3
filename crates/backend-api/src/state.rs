use std::{collections::HashMap, sync::Arc, time::Duration, time::Instant};

use axum::http::HeaderMap;
use eventdesk_config::{AuthConfig, CacheConfig};
use serde_json::Value;
use sqlx::SqlitePool;
use tokio::sync::Mutex;
use tracing::debug;

use crate::util::require_bearer;
use crate::ApiError;

#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
    auth: Arc<AuthConfig>,
    views: ViewCache,
}

impl AppState {
    pub fn new(pool: SqlitePool, auth: AuthConfig, cache: &CacheConfig) -> Self {
        Self {
            pool,
            auth: Arc::new(auth),
            views: ViewCache::new(Duration::from_secs(cache.view_ttl_seconds)),
        }
    }

    pub fn db_pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn views(&self) -> &ViewCache {
        &self.views
    }

    /// Check the bearer token against the configured tokens.
    /// With no tokens configured every request passes.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        if !self.auth.is_enforced() {
            return Ok(());
        }
        let token = require_bearer(headers)?;
        if !self.auth.accepts(&token) {
            return Err(ApiError::unauthorized("invalid bearer token"));
        }
        Ok(())
    }

    /// Drop every cached view that depends on the event.
    pub async fn revalidate_event(&self, event_id: &str) {
        self.views
            .invalidate_prefix(&ViewCache::event_prefix(event_id))
            .await;
    }
}

/// Short-lived cache of rendered dashboard views keyed by path.
///
/// Every invalidation bumps a generation counter. A view computed after a
/// miss is only stored when no invalidation happened since the caller read
/// [`ViewCache::generation`], so a slow reader cannot park stale data.
#[derive(Clone)]
pub struct ViewCache {
    inner: Arc<Mutex<Views>>,
    ttl: Duration,
}

#[derive(Default)]
struct Views {
    entries: HashMap<String, (Instant, Value)>,
    generation: u64,
}

impl ViewCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Views::default())),
            ttl,
        }
    }

    pub fn event_prefix(event_id: &str) -> String {
        format!("/events/{event_id}/")
    }

    pub fn overview_key(event_id: &str) -> String {
        format!("/events/{event_id}/overview")
    }

    pub fn budget_key(event_id: &str) -> String {
        format!("/events/{event_id}/budget")
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        let mut guard = self.inner.lock().await;
        Self::prune(&mut guard.entries, self.ttl);
        guard.entries.get(key).map(|(_, value)| value.clone())
    }

    /// Read before computing a view that will be passed to [`ViewCache::insert`].
    pub async fn generation(&self) -> u64 {
        self.inner.lock().await.generation
    }

    /// Store `value` unless the cache was invalidated after `generation` was read.
    pub async fn insert(&self, key: String, value: Value, generation: u64) {
        if self.ttl.is_zero() {
            return;
        }
        let mut guard = self.inner.lock().await;
        if guard.generation != generation {
            debug!(%key, "skipped caching a view computed before revalidation");
            return;
        }
        Self::prune(&mut guard.entries, self.ttl);
        guard.entries.insert(key, (Instant::now(), value));
    }

    pub async fn invalidate_prefix(&self, prefix: &str) {
        let mut guard = self.inner.lock().await;
        guard.generation = guard.generation.wrapping_add(1);
        let before = guard.entries.len();
        guard.entries.retain(|key, _| !key.starts_with(prefix));
        let dropped = before - guard.entries.len();
        if dropped > 0 {
            debug!(prefix, dropped, "revalidated cached views");
        }
    }

    pub async fn clear(&self) {
        let mut guard = self.inner.lock().await;
        guard.generation = guard.generation.wrapping_add(1);
        guard.entries.clear();
    }

    fn prune(map: &mut HashMap<String, (Instant, Value)>, ttl: Duration) {
        let now = Instant::now();
        map.retain(|_, (stored, _)| now.duration_since(*stored) < ttl);
    }
}
