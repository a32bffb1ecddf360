use crate::query::contains_wildcard;
use wildmatch::WildMatch;

/// How closely a value satisfied a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Closeness {
    Exact,
    Prefix,
    Substring,
}

/// Case-insensitive matcher for one term or filter value.
///
/// Wildcard-free values match as substrings; values containing `*` or `?`
/// are globs anchored to the whole field value.
#[derive(Debug, Clone)]
pub(crate) enum TextPattern {
    Literal(String),
    Glob {
        matcher: WildMatch,
        leading_literal: bool,
    },
}

impl TextPattern {
    pub(crate) fn new(value: &str) -> Self {
        let lower = value.to_lowercase();
        if contains_wildcard(&lower) {
            let leading_literal = lower
                .chars()
                .next()
                .is_some_and(|ch| ch != '*' && ch != '?');
            TextPattern::Glob {
                matcher: WildMatch::new(&lower),
                leading_literal,
            }
        } else {
            TextPattern::Literal(lower)
        }
    }

    /// The lowercased literal, when the pattern has no wildcard.
    pub(crate) fn literal(&self) -> Option<&str> {
        match self {
            TextPattern::Literal(value) => Some(value),
            TextPattern::Glob { .. } => None,
        }
    }

    /// `candidate` must already be lowercased.
    pub(crate) fn closeness(&self, candidate: &str) -> Option<Closeness> {
        match self {
            TextPattern::Literal(needle) => {
                if candidate == needle {
                    Some(Closeness::Exact)
                } else if candidate.starts_with(needle.as_str()) {
                    Some(Closeness::Prefix)
                } else if candidate.contains(needle.as_str()) {
                    Some(Closeness::Substring)
                } else {
                    None
                }
            }
            TextPattern::Glob {
                matcher,
                leading_literal,
            } => {
                if !matcher.matches(candidate) {
                    None
                } else if *leading_literal {
                    Some(Closeness::Prefix)
                } else {
                    Some(Closeness::Substring)
                }
            }
        }
    }
}
