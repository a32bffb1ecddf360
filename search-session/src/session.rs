use crate::config::SessionConfig;
use crate::history::SearchHistory;
use crate::keys::SessionKey;
use cloudnav_resource_search::FilterField;
use cloudnav_resource_search::SearchEngine;
use cloudnav_resource_search::SearchResult;
use cloudnav_resource_search::TokenSource;
use std::sync::Arc;
use tracing::debug;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Inactive,
    /// The user is typing; every edit re-runs the query.
    Active,
    /// The query was committed with Enter.
    ResultsShown,
}

/// What the host view should do after a key was handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    None,
    /// Query, results or suggestions changed.
    Refreshed,
    /// The selection moved onto this resource id.
    LoadDetails(String),
    /// Search was dismissed; show every resource again.
    RestoreUnfiltered,
}

/// State behind the dashboard's search box.
pub struct SearchSession {
    engine: Arc<SearchEngine>,
    config: SessionConfig,
    state: SessionState,
    query: String,
    results: Vec<SearchResult>,
    selected: Option<usize>,
    suggestions: Vec<String>,
    history: SearchHistory,
    history_cursor: Option<usize>,
    /// Query typed before history recall started.
    draft: String,
}

impl SearchSession {
    pub fn new(engine: Arc<SearchEngine>, config: SessionConfig) -> Self {
        Self {
            engine,
            config,
            state: SessionState::Inactive,
            query: String::new(),
            results: Vec::new(),
            selected: None,
            suggestions: Vec::new(),
            history: SearchHistory::new(config.history_limit),
            history_cursor: None,
            draft: String::new(),
        }
    }

    /// Starts a fresh interaction. History survives; everything else resets.
    pub fn enter(&mut self) {
        self.state = SessionState::Active;
        self.clear_query_state();
    }

    pub fn handle_key(&mut self, key: SessionKey) -> SessionEffect {
        if self.state == SessionState::Inactive {
            return SessionEffect::None;
        }
        match key {
            SessionKey::Char(ch) => {
                self.query.push(ch);
                self.edited()
            }
            SessionKey::Backspace => {
                if self.query.pop().is_none() {
                    return SessionEffect::None;
                }
                self.edited()
            }
            SessionKey::Enter => {
                self.history.push(&self.query);
                self.history_cursor = None;
                self.state = SessionState::ResultsShown;
                debug!(query = %self.query, results = self.results.len(), "search committed");
                SessionEffect::None
            }
            SessionKey::Up => self.move_selection(-1),
            SessionKey::Down => self.move_selection(1),
            SessionKey::Escape => {
                self.state = SessionState::Inactive;
                self.clear_query_state();
                SessionEffect::RestoreUnfiltered
            }
            SessionKey::HistoryPrev => self.recall_older(),
            SessionKey::HistoryNext => self.recall_newer(),
            SessionKey::AcceptSuggestion => self.accept_suggestion(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[SearchResult] {
        &self.results
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_result(&self) -> Option<&SearchResult> {
        self.selected.and_then(|idx| self.results.get(idx))
    }

    /// All suggestions for the token under the cursor.
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// The suggestions worth showing next to the query line.
    pub fn inline_suggestions(&self) -> &[String] {
        let shown = self.suggestions.len().min(self.config.inline_suggestions);
        &self.suggestions[..shown]
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    /// True when the host should render the unfiltered resource list.
    pub fn shows_unfiltered(&self) -> bool {
        self.state == SessionState::Inactive || self.query.trim().is_empty()
    }

    fn clear_query_state(&mut self) {
        self.query.clear();
        self.results.clear();
        self.selected = None;
        self.suggestions.clear();
        self.history_cursor = None;
        self.draft.clear();
    }

    fn edited(&mut self) -> SessionEffect {
        self.history_cursor = None;
        self.refresh()
    }

    fn refresh(&mut self) -> SessionEffect {
        self.state = SessionState::Active;
        self.selected = None;
        self.results = match self.engine.search(&self.query) {
            Ok(results) => results,
            Err(err) => {
                warn!(query = %self.query, "search failed: {err}");
                Vec::new()
            }
        };
        self.suggestions = match trailing_partial(&self.query) {
            Some((_, partial, Some(source))) => self.engine.field_suggestions(partial, source),
            Some((_, partial, None)) => self.engine.suggestions(partial),
            None => Vec::new(),
        };
        SessionEffect::Refreshed
    }

    fn move_selection(&mut self, delta: isize) -> SessionEffect {
        let len = self.results.len();
        if len == 0 {
            return SessionEffect::None;
        }
        let current = match self.selected {
            Some(idx) => idx as isize,
            // First Down lands on the top row, first Up on the bottom one.
            None if delta > 0 => -1,
            None => 0,
        };
        let next = (current + delta).rem_euclid(len as isize) as usize;
        self.selected = Some(next);
        match self.results.get(next) {
            Some(result) => SessionEffect::LoadDetails(result.resource_id.clone()),
            None => SessionEffect::None,
        }
    }

    fn recall_older(&mut self) -> SessionEffect {
        if self.history.is_empty() {
            return SessionEffect::None;
        }
        let next = match self.history_cursor {
            None => {
                self.draft = self.query.clone();
                0
            }
            Some(idx) => (idx + 1).min(self.history.len() - 1),
        };
        if self.history_cursor == Some(next) {
            return SessionEffect::None;
        }
        self.recall(next)
    }

    fn recall_newer(&mut self) -> SessionEffect {
        match self.history_cursor {
            None => SessionEffect::None,
            Some(0) => {
                self.history_cursor = None;
                self.query = std::mem::take(&mut self.draft);
                self.refresh()
            }
            Some(idx) => self.recall(idx - 1),
        }
    }

    fn recall(&mut self, idx: usize) -> SessionEffect {
        let Some(entry) = self.history.get(idx) else {
            return SessionEffect::None;
        };
        self.query = entry.to_string();
        self.history_cursor = Some(idx);
        self.refresh()
    }

    /// Replaces the trailing value with the best suggestion that survives
    /// re-parsing as a single token.
    fn accept_suggestion(&mut self) -> SessionEffect {
        let Some((offset, _, _)) = trailing_partial(&self.query) else {
            return SessionEffect::None;
        };
        let Some(accepted) = self
            .suggestions
            .iter()
            .find(|suggestion| !suggestion.chars().any(char::is_whitespace))
            .cloned()
        else {
            return SessionEffect::None;
        };
        self.query.truncate(offset);
        self.query.push_str(&accepted);
        self.edited()
    }
}

/// Byte offset and text of the value being typed at the end of `query`, plus
/// the field it belongs to.
///
/// For a trailing filter token only the value part counts: `type:vi` yields
/// `vi`, `tag:env=pr` yields `pr`, and `tag:en` yields the key `en`. Free text
/// has no field.
fn trailing_partial(query: &str) -> Option<(usize, &str, Option<TokenSource>)> {
    let start = query
        .char_indices()
        .rev()
        .find(|(_, ch)| ch.is_whitespace())
        .map_or(0, |(idx, ch)| idx + ch.len_utf8());
    let token = &query[start..];
    if token.is_empty() {
        return None;
    }
    let (offset, source) = match token.split_once(':') {
        Some((prefix, rest)) => {
            let value_start = start + prefix.len() + 1;
            match FilterField::from_prefix(prefix) {
                Some(FilterField::Tag) => match rest.split_once('=') {
                    Some((key, _)) => (value_start + key.len() + 1, Some(TokenSource::TagValue)),
                    None => (value_start, Some(TokenSource::TagKey)),
                },
                Some(FilterField::Type) => (value_start, Some(TokenSource::Type)),
                Some(FilterField::Location) => (value_start, Some(TokenSource::Location)),
                Some(FilterField::ResourceGroup) => (value_start, Some(TokenSource::ResourceGroup)),
                None => (start, None),
            }
        }
        None => (start, None),
    };
    let partial = &query[offset..];
    if partial.is_empty() {
        None
    } else {
        Some((offset, partial, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn trailing_partial_uses_the_last_token() {
        assert_eq!(trailing_partial("web"), Some((0, "web", None)));
        assert_eq!(trailing_partial("type:vm we"), Some((8, "we", None)));
        assert_eq!(trailing_partial("web "), None);
        assert_eq!(trailing_partial(""), None);
    }

    #[test]
    fn trailing_partial_skips_filter_prefixes() {
        assert_eq!(
            trailing_partial("location:ea"),
            Some((9, "ea", Some(TokenSource::Location)))
        );
        assert_eq!(
            trailing_partial("web tag:env=pr"),
            Some((12, "pr", Some(TokenSource::TagValue)))
        );
        assert_eq!(trailing_partial("tag:en"), Some((4, "en", Some(TokenSource::TagKey))));
        assert_eq!(trailing_partial("rg:rg-e"), Some((3, "rg-e", Some(TokenSource::ResourceGroup))));
        assert_eq!(trailing_partial("type:Micro"), Some((5, "Micro", Some(TokenSource::Type))));
        assert_eq!(trailing_partial("type:"), None);
        assert_eq!(trailing_partial("sku:std"), Some((0, "sku:std", None)));
    }
}
