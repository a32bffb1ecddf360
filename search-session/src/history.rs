use std::collections::VecDeque;

/// Committed queries, most recent first, without duplicates.
#[derive(Debug, Clone)]
pub struct SearchHistory {
    entries: VecDeque<String>,
    limit: usize,
}

impl SearchHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(limit),
            limit,
        }
    }

    /// Records `query` at the front. Blank queries are ignored; an existing
    /// identical entry moves to the front instead of being duplicated.
    pub fn push(&mut self, query: &str) {
        let query = query.trim();
        if query.is_empty() || self.limit == 0 {
            return;
        }
        self.entries.retain(|existing| existing != query);
        self.entries.push_front(query.to_string());
        self.entries.truncate(self.limit);
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
