use crate::model::Resource;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::HashMap;

/// Resource field a suggestion token was collected from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenSource {
    Name,
    Type,
    Location,
    ResourceGroup,
    TagKey,
    TagValue,
}

impl TokenSource {
    const fn bit(self) -> u8 {
        1 << self as u8
    }
}

#[derive(Debug, Clone)]
struct SuggestionToken {
    lower: String,
    display: String,
    /// Number of distinct resources carrying the token.
    frequency: usize,
    /// [`TokenSource`] bits for every field the token appeared in.
    sources: u8,
}

impl SuggestionToken {
    fn from_source(&self, source: TokenSource) -> bool {
        self.sources & source.bit() != 0
    }
}

/// Prefix-searchable table of every indexed token, sorted by lowercase form.
#[derive(Debug, Default)]
pub(crate) struct SuggestionTable {
    tokens: Vec<SuggestionToken>,
}

impl SuggestionTable {
    pub(crate) fn build(resources: &[Resource]) -> Self {
        let mut seen: HashMap<String, (String, BTreeSet<usize>, u8)> = HashMap::new();
        for (position, resource) in resources.iter().enumerate() {
            let mut tag_tokens: Vec<(&String, TokenSource)> = resource
                .tags
                .iter()
                .flat_map(|(key, value)| {
                    [(key, TokenSource::TagKey), (value, TokenSource::TagValue)]
                })
                .collect();
            tag_tokens.sort();
            let fields = [
                (&resource.name, TokenSource::Name),
                (&resource.resource_type, TokenSource::Type),
                (&resource.location, TokenSource::Location),
                (&resource.resource_group, TokenSource::ResourceGroup),
            ];
            for (token, source) in fields.into_iter().chain(tag_tokens) {
                if token.trim().is_empty() {
                    continue;
                }
                let entry = seen
                    .entry(token.to_lowercase())
                    .or_insert_with(|| (token.clone(), BTreeSet::new(), 0));
                entry.1.insert(position);
                entry.2 |= source.bit();
            }
        }

        let mut tokens: Vec<SuggestionToken> = seen
            .into_iter()
            .map(|(lower, (display, holders, sources))| SuggestionToken {
                lower,
                display,
                frequency: holders.len(),
                sources,
            })
            .collect();
        tokens.sort_by(|a, b| a.lower.cmp(&b.lower));
        Self { tokens }
    }

    pub(crate) fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Tokens starting with `partial`, most frequent first, then shortest.
    ///
    /// With a `source`, only tokens seen in that field are returned.
    pub(crate) fn lookup(
        &self,
        partial: &str,
        min_len: usize,
        source: Option<TokenSource>,
    ) -> Vec<String> {
        let partial = partial.trim();
        if partial.chars().count() < min_len {
            return Vec::new();
        }
        let needle = partial.to_lowercase();
        let start = self
            .tokens
            .partition_point(|token| token.lower.as_str() < needle.as_str());
        let mut matches: Vec<&SuggestionToken> = self.tokens[start..]
            .iter()
            .take_while(|token| token.lower.starts_with(needle.as_str()))
            .filter(|token| source.is_none_or(|source| token.from_source(source)))
            .collect();
        matches.sort_by(|a, b| {
            b.frequency
                .cmp(&a.frequency)
                .then_with(|| a.lower.chars().count().cmp(&b.lower.chars().count()))
                .then_with(|| a.lower.cmp(&b.lower))
        });
        matches
            .into_iter()
            .map(|token| token.display.clone())
            .collect()
    }
}
