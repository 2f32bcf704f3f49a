//! In-memory cache of database enum values.
//!
//! Form dropdowns render from Postgres enum types, which only change
//! when a migration runs. The cache holds one snapshot for up to five
//! minutes; a failed refetch serves the stale snapshot instead of
//! erroring. [`EnumCache::invalidate`] drops the snapshot and notifies
//! subscribers, which the `/events` SSE endpoint forwards to browsers
//! as `enum_changed` events.
//!
//! Concurrent refreshes may race and fetch redundantly; the last writer
//! wins and all of them return valid data.

use std::sync::Arc;
use std::time::{Duration, Instant};

use sqlx::PgPool;
use tokio::sync::{RwLock, broadcast};

use crate::db::RepositoryError;
use crate::db::enums::{self, EnumMap};

const CACHE_TTL: Duration = Duration::from_secs(300);
const CHANNEL_CAPACITY: usize = 16;

struct Snapshot {
    map: Arc<EnumMap>,
    fetched_at: Instant,
}

/// Cached view of the application's Postgres enum types.
pub struct EnumCache {
    pool: PgPool,
    snapshot: RwLock<Option<Snapshot>>,
    changed: broadcast::Sender<()>,
}

impl EnumCache {
    /// Create an empty cache backed by the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        let (changed, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self {
            pool,
            snapshot: RwLock::new(None),
            changed,
        }
    }

    /// Return the enum map, refetching if the snapshot is missing or
    /// older than the TTL.
    ///
    /// If the refetch fails but a stale snapshot exists, the stale data
    /// is returned and the failure is logged.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] only when the fetch fails and no
    /// snapshot has ever been taken.
    pub async fn fetch(&self) -> Result<Arc<EnumMap>, RepositoryError> {
        if let Some(snapshot) = self.snapshot.read().await.as_ref()
            && snapshot.fetched_at.elapsed() < CACHE_TTL
        {
            return Ok(Arc::clone(&snapshot.map));
        }

        match enums::fetch_enum_types(&self.pool).await {
            Ok(map) => {
                let map = Arc::new(map);
                *self.snapshot.write().await = Some(Snapshot {
                    map: Arc::clone(&map),
                    fetched_at: Instant::now(),
                });
                Ok(map)
            }
            Err(err) => {
                let guard = self.snapshot.read().await;
                if let Some(snapshot) = guard.as_ref() {
                    tracing::warn!(%err, "enum refetch failed, serving stale snapshot");
                    return Ok(Arc::clone(&snapshot.map));
                }
                Err(err)
            }
        }
    }

    /// Drop the snapshot and notify subscribers that the enum set
    /// changed. The next [`Self::fetch`] refetches.
    pub async fn invalidate(&self) {
        *self.snapshot.write().await = None;
        // No receivers is fine; nobody is watching the SSE stream.
        let _ = self.changed.send(());
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.changed.subscribe()
    }
}

impl std::fmt::Debug for EnumCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnumCache").finish_non_exhaustive()
    }
}
