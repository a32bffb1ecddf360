use crate::config::ScoreWeights;
use crate::error::Result;
use crate::error::SearchError;
use crate::index::IndexGeneration;
use crate::matcher::RawHit;
use crate::model::FieldMatch;
use crate::model::MatchKind;
use crate::model::MatchType;
use crate::model::SearchResult;
use std::cmp::Ordering;
use std::collections::BTreeMap;

pub(crate) fn hit_score(kind: MatchKind, field: MatchType, weights: &ScoreWeights) -> f32 {
    let base = match kind {
        MatchKind::Exact => weights.exact,
        MatchKind::FieldFilter => weights.field_filter,
        MatchKind::Prefix => weights.prefix,
        MatchKind::Substring => weights.substring,
    };
    if field.is_secondary() {
        base * weights.secondary_multiplier
    } else {
        base
    }
}

/// Collapses raw hits into one result per resource and orders them.
///
/// Within a field (each tag key counts as its own field) only the strongest
/// hit counts; distinct fields add up.
pub(crate) fn rank(
    index: &IndexGeneration,
    hits: Vec<RawHit>,
    weights: &ScoreWeights,
) -> Result<Vec<SearchResult>> {
    let mut grouped: BTreeMap<usize, BTreeMap<(MatchType, Option<String>), FieldMatch>> =
        BTreeMap::new();
    for hit in hits {
        if index.resource(hit.resource).is_none() {
            return Err(SearchError::DanglingHit {
                position: hit.resource,
                generation: index.generation(),
            });
        }
        let score = hit_score(hit.kind, hit.field, weights);
        let fields = grouped.entry(hit.resource).or_default();
        let slot = fields.entry((hit.field, hit.key)).or_insert_with(|| FieldMatch {
            match_type: hit.field,
            match_value: hit.value.clone(),
            kind: hit.kind,
            score,
        });
        if score > slot.score {
            slot.match_value = hit.value;
            slot.kind = hit.kind;
            slot.score = score;
        }
    }

    let mut results = Vec::with_capacity(grouped.len());
    for (position, fields) in grouped {
        let Some(resource) = index.resource(position) else {
            continue;
        };
        let mut matches: Vec<FieldMatch> = fields.into_values().collect();
        matches.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.match_type.cmp(&b.match_type))
                .then_with(|| a.match_value.cmp(&b.match_value))
        });
        let Some(primary) = matches.first() else {
            continue;
        };
        results.push(SearchResult {
            resource_id: resource.id.clone(),
            name: resource.name.clone(),
            match_type: primary.match_type,
            match_value: primary.match_value.clone(),
            score: matches.iter().map(|m| m.score).sum(),
            matches,
        });
    }

    results.sort_by(compare_results);
    Ok(results)
}

fn compare_results(a: &SearchResult, b: &SearchResult) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.resource_id.cmp(&b.resource_id))
}
