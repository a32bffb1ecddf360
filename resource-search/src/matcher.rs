use crate::index::IndexGeneration;
use crate::index::PositionSet;
use crate::index::field_value;
use crate::model::MatchKind;
use crate::model::MatchType;
use crate::pattern::Closeness;
use crate::pattern::TextPattern;
use crate::query::FieldFilter;
use crate::query::FilterField;
use crate::query::Query;

/// One field of one resource satisfying part of a query.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawHit {
    pub resource: usize,
    pub field: MatchType,
    /// Lowercased tag key, so hits on different tags stay distinct.
    pub key: Option<String>,
    pub value: String,
    pub kind: MatchKind,
}

/// Evaluates `query` against one generation. Hits are unordered and may
/// contain several entries per resource.
pub(crate) fn evaluate(index: &IndexGeneration, query: &Query) -> Vec<RawHit> {
    if query.is_empty() || index.is_empty() {
        return Vec::new();
    }

    let mut hits = Vec::new();
    let mut candidates: Option<PositionSet> = None;
    for filter in &query.filters {
        let (matched, filter_hits) = resolve_filter(index, filter);
        let narrowed = match candidates {
            Some(current) => current.intersection(&matched).copied().collect(),
            None => matched,
        };
        if narrowed.is_empty() {
            return Vec::new();
        }
        candidates = Some(narrowed);
        hits.extend(filter_hits);
    }

    let mut candidates = candidates.unwrap_or_else(|| index.all_positions());
    for term in &query.terms {
        let (matched, term_hits) = resolve_term(index, term, &candidates);
        if matched.is_empty() {
            return Vec::new();
        }
        candidates = matched;
        hits.extend(term_hits);
    }

    if query.match_all {
        for position in &candidates {
            if let Some(resource) = index.resource(*position) {
                hits.push(RawHit {
                    resource: *position,
                    field: MatchType::Name,
                    key: None,
                    value: resource.name.clone(),
                    kind: MatchKind::Substring,
                });
            }
        }
    }

    hits.retain(|hit| candidates.contains(&hit.resource));
    hits
}

fn filter_target(field: FilterField) -> MatchType {
    match field {
        FilterField::Type => MatchType::Type,
        FilterField::Location => MatchType::Location,
        FilterField::ResourceGroup => MatchType::ResourceGroup,
        FilterField::Tag => MatchType::Tag,
    }
}

fn resolve_filter(index: &IndexGeneration, filter: &FieldFilter) -> (PositionSet, Vec<RawHit>) {
    let field = filter_target(filter.field);
    let pattern = TextPattern::new(&filter.value);
    let key = filter.key.as_ref().map(|key| key.to_lowercase());
    let mut matched = PositionSet::new();
    let mut hits = Vec::new();

    // Wildcard-free values hit the exact map first; the scan below then only
    // has to pick up the substring matches.
    let literal = pattern.literal();
    if let Some(literal) = literal {
        let exact = match key.as_deref() {
            Some(key) => index.tag_lookup(key, literal),
            None => index.exact_lookup(field, literal),
        };
        for position in exact.into_iter().flatten() {
            let Some(value) = exact_display(index, *position, field, key.as_deref(), literal) else {
                continue;
            };
            matched.insert(*position);
            hits.push(RawHit {
                resource: *position,
                field,
                key: key.clone(),
                value,
                kind: MatchKind::Exact,
            });
        }
    }

    for tuple in index.tuples_for(field) {
        if key.is_some() && tuple.key != key {
            continue;
        }
        if literal.is_some_and(|literal| tuple.value_lower == literal) {
            continue;
        }
        if pattern.closeness(&tuple.value_lower).is_some() {
            matched.insert(tuple.resource);
            hits.push(RawHit {
                resource: tuple.resource,
                field,
                key: tuple.key.clone(),
                value: tuple.display.clone(),
                kind: MatchKind::FieldFilter,
            });
        }
    }

    (matched, hits)
}

fn exact_display(
    index: &IndexGeneration,
    position: usize,
    field: MatchType,
    key_lower: Option<&str>,
    value_lower: &str,
) -> Option<String> {
    let resource = index.resource(position)?;
    match key_lower {
        Some(key_lower) => resource
            .tags
            .iter()
            .find(|(key, value)| {
                key.to_lowercase() == key_lower && value.to_lowercase() == value_lower
            })
            .map(|(key, value)| format!("{key}={value}")),
        None => Some(field_value(resource, field).to_string()),
    }
}

fn resolve_term(
    index: &IndexGeneration,
    term: &str,
    candidates: &PositionSet,
) -> (PositionSet, Vec<RawHit>) {
    let pattern = TextPattern::new(term);
    let mut matched = PositionSet::new();
    let mut hits = Vec::new();
    for field in MatchType::ALL {
        for tuple in index.tuples_for(field) {
            if !candidates.contains(&tuple.resource) {
                continue;
            }
            let Some(closeness) = pattern.closeness(&tuple.value_lower) else {
                continue;
            };
            matched.insert(tuple.resource);
            hits.push(RawHit {
                resource: tuple.resource,
                field: tuple.field,
                key: tuple.key.clone(),
                value: tuple.display.clone(),
                kind: match closeness {
                    Closeness::Exact => MatchKind::Exact,
                    Closeness::Prefix => MatchKind::Prefix,
                    Closeness::Substring => MatchKind::Substring,
                },
            });
        }
    }
    (matched, hits)
}
