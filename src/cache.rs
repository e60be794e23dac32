//! In-process cache for the customer-facing menu catalog.
//!
//! The cache is an explicit object shared through `Arc`; every catalog write and every
//! order placement calls [`CatalogCache::invalidate`]. It lives in one process only, so
//! several bot instances over the same database each hold their own copy and may
//! serve a stale menu for up to one TTL.

use crate::{
    core::menu::{MenuCatalog, load_catalog},
    errors::Result,
};
use sea_orm::ConnectionTrait;
use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

/// Default time a snapshot stays fresh.
pub const DEFAULT_CATALOG_TTL: Duration = Duration::from_secs(300);

#[derive(Debug)]
struct CacheEntry {
    catalog: Arc<MenuCatalog>,
    loaded_at: Instant,
}

/// TTL cache holding one [`MenuCatalog`] snapshot.
#[derive(Debug)]
pub struct CatalogCache {
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new(DEFAULT_CATALOG_TTL)
    }
}

impl CatalogCache {
    /// Creates an empty cache whose snapshots live for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entry: RwLock::new(None),
        }
    }

    fn fresh(&self, entry: &CacheEntry) -> Option<Arc<MenuCatalog>> {
        (entry.loaded_at.elapsed() < self.ttl).then(|| Arc::clone(&entry.catalog))
    }

    /// Returns the cached catalog, loading it from the database when empty or stale.
    pub async fn get_or_load<C>(&self, db: &C) -> Result<Arc<MenuCatalog>>
    where
        C: ConnectionTrait,
    {
        if let Some(catalog) = self.entry.read().await.as_ref().and_then(|e| self.fresh(e)) {
            trace!("Catalog cache hit");
            return Ok(catalog);
        }

        let mut writer = self.entry.write().await;
        // Another task may have refreshed while we waited for the lock
        if let Some(catalog) = writer.as_ref().and_then(|e| self.fresh(e)) {
            return Ok(catalog);
        }

        let catalog = Arc::new(load_catalog(db).await?);
        info!(
            "Catalog cache refreshed with {} items in {} categories.",
            catalog.items.len(),
            catalog.categories.len()
        );
        *writer = Some(CacheEntry {
            catalog: Arc::clone(&catalog),
            loaded_at: Instant::now(),
        });
        Ok(catalog)
    }

    /// Drops the current snapshot so the next read reloads.
    pub async fn invalidate(&self) {
        debug!("Catalog cache invalidated");
        *self.entry.write().await = None;
    }

    /// True when a snapshot is held and still within its TTL.
    pub async fn is_fresh(&self) -> bool {
        self.entry
            .read()
            .await
            .as_ref()
            .is_some_and(|e| self.fresh(e).is_some())
    }
}
