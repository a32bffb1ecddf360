use crate::model::SearchResult;
use crate::query::FieldFilter;
use crate::query::Query;
use lru::LruCache;
use std::num::NonZeroUsize;

/// Identity of a parsed query for caching.
///
/// Built from the constraints the matcher evaluates, never from `raw`, so a
/// hand-built [`Query`] cannot collide with a parsed one that shares its text.
/// Pending filters are left out because they constrain nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    terms: Vec<String>,
    filters: Vec<FieldFilter>,
    match_all: bool,
}

impl CacheKey {
    pub(crate) fn new(query: &Query) -> Self {
        Self {
            terms: query.terms.clone(),
            filters: query.filters.clone(),
            match_all: query.match_all,
        }
    }
}

/// Recently ranked queries for the current index generation.
///
/// Entries never outlive the generation they were computed against: storing a
/// result for a newer generation drops everything older, and results for an
/// older generation are ignored.
pub(crate) struct QueryCache {
    generation: u64,
    entries: Option<LruCache<CacheKey, Vec<SearchResult>>>,
}

impl QueryCache {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            generation: 0,
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    pub(crate) fn get(&mut self, generation: u64, key: &CacheKey) -> Option<Vec<SearchResult>> {
        if generation != self.generation {
            return None;
        }
        self.entries.as_mut()?.get(key).cloned()
    }

    pub(crate) fn put(&mut self, generation: u64, key: CacheKey, results: Vec<SearchResult>) {
        if generation < self.generation {
            return;
        }
        if generation > self.generation {
            self.reset(generation);
        }
        if let Some(entries) = self.entries.as_mut() {
            entries.put(key, results);
        }
    }

    pub(crate) fn reset(&mut self, generation: u64) {
        self.generation = generation;
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, LruCache::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MatchType;
    use crate::query::parse;
    use pretty_assertions::assert_eq;

    fn result(id: &str) -> SearchResult {
        SearchResult {
            resource_id: id.to_string(),
            name: id.to_string(),
            match_type: MatchType::Name,
            match_value: id.to_string(),
            score: 40.0,
            matches: Vec::new(),
        }
    }

    fn key(raw: &str) -> CacheKey {
        CacheKey::new(&parse(raw))
    }

    #[test]
    fn entries_are_scoped_to_a_generation() {
        let mut cache = QueryCache::new(4);
        cache.put(1, key("web"), vec![result("a")]);
        assert_eq!(cache.get(1, &key("web")), Some(vec![result("a")]));
        assert_eq!(cache.get(2, &key("web")), None);

        cache.put(2, key("db"), vec![result("b")]);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(2, &key("web")), None);

        cache.put(1, key("late"), vec![result("c")]);
        assert_eq!(cache.get(2, &key("late")), None);
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let mut cache = QueryCache::new(0);
        cache.put(1, key("web"), vec![result("a")]);
        assert_eq!(cache.get(1, &key("web")), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn keys_ignore_whitespace_and_pending_filters() {
        assert_eq!(key("  web   type:vm "), key("web type:vm"));
        assert_eq!(key("web type:"), key("web"));
        assert_ne!(key("web"), key("web type:vm"));
    }

    #[test]
    fn keys_follow_parsed_terms_not_raw_text() {
        let mut edited = parse("web");
        edited.terms = vec!["db".to_string()];
        assert_ne!(CacheKey::new(&edited), key("web"));
        assert_eq!(CacheKey::new(&edited), key("db"));
    }
}
