use crate::cache::CacheKey;
use crate::cache::QueryCache;
use crate::config::SearchConfig;
use crate::error::Result;
use crate::error::SearchError;
use crate::index::IndexGeneration;
use crate::index::IndexStats;
use crate::matcher;
use crate::model::Resource;
use crate::model::SearchResult;
use crate::query::Query;
use crate::query::parse;
use crate::scorer;
use crate::suggest::TokenSource;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::RwLock;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;

/// Resource search over the most recently published snapshot.
///
/// Writers build a complete [`IndexGeneration`] without holding any lock and
/// then swap the shared pointer; readers clone the pointer under a read lock
/// and work against that immutable generation.
pub struct SearchEngine {
    config: SearchConfig,
    current: RwLock<Arc<IndexGeneration>>,
    next_generation: AtomicU64,
    cache: Mutex<QueryCache>,
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new(SearchConfig::default())
    }
}

impl SearchEngine {
    pub fn new(config: SearchConfig) -> Self {
        let cache = QueryCache::new(config.cache_size);
        Self {
            config,
            current: RwLock::new(Arc::new(IndexGeneration::default())),
            next_generation: AtomicU64::new(0),
            cache: Mutex::new(cache),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Replaces the searchable set.
    ///
    /// When two calls overlap, the one holding the higher generation wins
    /// regardless of which finishes building first.
    pub fn set_resources(&self, resources: Vec<Resource>) {
        let start = Instant::now();
        let generation = self.next_generation.fetch_add(1, Ordering::SeqCst) + 1;
        let built = Arc::new(IndexGeneration::build(generation, resources));
        let stats = built.stats();

        if !self.publish(built) {
            return;
        }

        info!(
            generation,
            resources = stats.resources,
            tuples = stats.tuples,
            tokens = stats.tokens,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "published index generation"
        );
    }

    /// Swaps in `built` unless a newer generation is already visible.
    pub(crate) fn publish(&self, built: Arc<IndexGeneration>) -> bool {
        let generation = built.generation();
        {
            let mut guard = match self.current.write() {
                Ok(guard) => guard,
                Err(poisoned) => {
                    warn!("recovering index pointer after a panicked writer");
                    self.current.clear_poison();
                    poisoned.into_inner()
                }
            };
            if generation < guard.generation() {
                debug!(
                    generation,
                    current = guard.generation(),
                    "dropping stale index generation"
                );
                return false;
            }
            *guard = built;
        }

        match self.cache.lock() {
            Ok(mut cache) => cache.reset(generation),
            Err(poisoned) => {
                self.cache.clear_poison();
                poisoned.into_inner().reset(generation);
            }
        }
        true
    }

    /// The generation currently visible to readers.
    pub fn current_generation(&self) -> Result<Arc<IndexGeneration>> {
        self.current
            .read()
            .map(|guard| Arc::clone(&*guard))
            .map_err(|_| SearchError::IndexUnavailable)
    }

    pub fn search(&self, raw: &str) -> Result<Vec<SearchResult>> {
        self.search_query(&parse(raw))
    }

    pub fn search_query(&self, query: &Query) -> Result<Vec<SearchResult>> {
        let index = self.current_generation()?;
        if query.is_empty() || index.is_empty() {
            return Ok(Vec::new());
        }

        let key = CacheKey::new(query);
        if let Some(cached) = self.cached(index.generation(), &key) {
            debug!(query = %query.raw, results = cached.len(), "query cache hit");
            return Ok(cached);
        }

        let start = Instant::now();
        let hits = matcher::evaluate(&index, query);
        let hit_count = hits.len();
        let mut results = scorer::rank(&index, hits, &self.config.weights)?;
        if self.config.max_results > 0 {
            results.truncate(self.config.max_results);
        }

        if let Ok(mut cache) = self.cache.lock() {
            cache.put(index.generation(), key, results.clone());
        }

        debug!(
            query = %query.raw,
            generation = index.generation(),
            hits = hit_count,
            results = results.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "search complete"
        );
        Ok(results)
    }

    /// Autocomplete candidates for `partial`; empty below the minimum length.
    pub fn suggestions(&self, partial: &str) -> Vec<String> {
        self.lookup_suggestions(partial, None)
    }

    /// Like [`Self::suggestions`], limited to tokens seen in one field.
    pub fn field_suggestions(&self, partial: &str, source: TokenSource) -> Vec<String> {
        self.lookup_suggestions(partial, Some(source))
    }

    fn lookup_suggestions(&self, partial: &str, source: Option<TokenSource>) -> Vec<String> {
        match self.current_generation() {
            Ok(index) => index
                .suggestions()
                .lookup(partial, self.config.min_suggestion_len, source),
            Err(err) => {
                warn!("suggestions unavailable: {err}");
                Vec::new()
            }
        }
    }

    pub fn resource(&self, id: &str) -> Option<Resource> {
        self.current_generation()
            .ok()
            .and_then(|index| index.resource_by_id(id).cloned())
    }

    /// Unfiltered view in snapshot order.
    pub fn resources(&self) -> Vec<Resource> {
        self.current_generation()
            .map(|index| index.resources().to_vec())
            .unwrap_or_default()
    }

    pub fn stats(&self) -> IndexStats {
        self.current_generation()
            .map(|index| index.stats())
            .unwrap_or_default()
    }

    fn cached(&self, generation: u64, key: &CacheKey) -> Option<Vec<SearchResult>> {
        self.cache.lock().ok()?.get(generation, key)
    }
}
