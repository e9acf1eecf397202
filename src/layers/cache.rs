//! Lock-free reference-layer cache shared across analyses

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use dashmap::DashMap;
use tracing::{debug, warn};

use super::feature::ReferenceLayer;
use super::source::LayerSource;
use crate::error::{Error, Result};

/// A cached layer with the tick of its most recent access
struct CachedLayer {
    layer: Arc<ReferenceLayer>,
    last_access: AtomicU64,
}

/// Lazily populated, bounded cache of loaded layers.
///
/// Built once by the caller and passed by reference into each analysis.
/// Layers are handed out as `Arc`s, so eviction never invalidates a layer an
/// analysis is still reading. When full, the least recently used layer is
/// evicted.
pub struct LayerCache {
    source: Arc<dyn LayerSource>,
    cache: Arc<DashMap<String, CachedLayer>>,
    clock: Arc<AtomicU64>,
    max_layers: usize,
}

impl LayerCache {
    /// Creates a new lock-free layer cache
    ///
    /// # Arguments
    /// * `source` - Where layers are loaded from on a miss
    /// * `max_layers` - Maximum number of layers kept in memory
    pub fn new<S: LayerSource + 'static>(source: S, max_layers: usize) -> Self {
        Self {
            source: Arc::new(source),
            cache: Arc::new(DashMap::new()),
            clock: Arc::new(AtomicU64::new(0)),
            max_layers: max_layers.max(1),
        }
    }

    /// Returns a layer, loading it from the source on a miss
    pub fn get(&self, name: &str) -> Result<Arc<ReferenceLayer>> {
        if let Some(layer) = self.cached(name) {
            return Ok(layer);
        }

        let layer = Arc::new(self.source.load(name)?);
        self.put(name, Arc::clone(&layer));
        debug!(layer = name, features = layer.len(), "layer loaded");
        Ok(layer)
    }

    /// Returns a layer only if it is already cached
    pub fn cached(&self, name: &str) -> Option<Arc<ReferenceLayer>> {
        let entry = self.cache.get(name)?;
        entry.last_access.store(self.tick(), Ordering::Relaxed);
        Some(Arc::clone(&entry.layer))
    }

    /// Loads every named layer up front, returning the ones that failed
    pub fn preload<S: AsRef<str>>(&self, names: &[S]) -> Vec<(String, Error)> {
        names
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                match self.get(name) {
                    Ok(_) => None,
                    Err(e) => {
                        warn!(layer = name, error = %e, "layer failed to preload");
                        Some((name.to_string(), e))
                    }
                }
            })
            .collect()
    }

    fn tick(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn put(&self, name: &str, layer: Arc<ReferenceLayer>) {
        if !self.cache.contains_key(name) {
            while self.cache.len() >= self.max_layers {
                if !self.evict_least_recent() {
                    break;
                }
            }
        }

        let entry = CachedLayer {
            layer,
            last_access: AtomicU64::new(self.tick()),
        };
        self.cache.insert(name.to_string(), entry);
    }

    /// Removes the entry with the oldest access tick
    fn evict_least_recent(&self) -> bool {
        // The iterator holds shard locks, so the key is collected before removal
        let oldest = self
            .cache
            .iter()
            .min_by_key(|entry| entry.value().last_access.load(Ordering::Relaxed))
            .map(|entry| entry.key().clone());

        match oldest {
            Some(name) => {
                self.cache.remove(&name);
                debug!(layer = %name, "layer evicted");
                true
            }
            None => false,
        }
    }

    /// Clears the cache
    pub fn clear(&self) {
        self.cache.clear();
    }

    /// Returns the current number of cached layers
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Returns cache statistics
    pub fn stats(&self) -> LayerCacheStats {
        let feature_count: usize = self.cache
            .iter()
            .map(|entry| entry.value().layer.len())
            .sum();

        LayerCacheStats {
            layer_count: self.cache.len(),
            feature_count,
            max_layers: self.max_layers,
        }
    }
}

impl Clone for LayerCache {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            cache: Arc::clone(&self.cache),
            clock: Arc::clone(&self.clock),
            max_layers: self.max_layers,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct LayerCacheStats {
    /// Number of layers currently in cache
    pub layer_count: usize,
    /// Total features across cached layers
    pub feature_count: usize,
    /// Maximum number of layers
    pub max_layers: usize,
}
