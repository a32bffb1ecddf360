//! Query language parsing.
//!
//! Parsing is total: anything that does not look like a recognized filter is
//! kept as a free-text term, so a half-typed query never turns into an error.

use serde::Deserialize;
use serde::Serialize;

const WILDCARD_CHARS: [char; 2] = ['*', '?'];

/// Short names accepted by `type:` in place of the full provider type.
const TYPE_ALIASES: &[(&str, &str)] = &[
    ("aks", "Microsoft.ContainerService/managedClusters"),
    ("disk", "Microsoft.Compute/disks"),
    ("keyvault", "Microsoft.KeyVault/vaults"),
    ("kv", "Microsoft.KeyVault/vaults"),
    ("lb", "Microsoft.Network/loadBalancers"),
    ("nic", "Microsoft.Network/networkInterfaces"),
    ("nsg", "Microsoft.Network/networkSecurityGroups"),
    ("pip", "Microsoft.Network/publicIPAddresses"),
    ("publicip", "Microsoft.Network/publicIPAddresses"),
    ("sql", "Microsoft.Sql/servers"),
    ("storage", "Microsoft.Storage/storageAccounts"),
    ("vm", "Microsoft.Compute/virtualMachines"),
    ("vmss", "Microsoft.Compute/virtualMachineScaleSets"),
    ("vnet", "Microsoft.Network/virtualNetworks"),
    ("webapp", "Microsoft.Web/sites"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Type,
    Location,
    ResourceGroup,
    Tag,
}

impl FilterField {
    /// Recognizes a filter prefix (`type`, `location`, `rg`, `tag`) in any case.
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_lowercase().as_str() {
            "type" => Some(FilterField::Type),
            "location" => Some(FilterField::Location),
            "rg" => Some(FilterField::ResourceGroup),
            "tag" => Some(FilterField::Tag),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: FilterField,
    /// Tag key; only set for [`FilterField::Tag`].
    pub key: Option<String>,
    pub value: String,
    pub has_wildcard: bool,
}

impl FieldFilter {
    fn new(field: FilterField, key: Option<String>, value: String) -> Self {
        let has_wildcard = contains_wildcard(&value);
        Self {
            field,
            key,
            value,
            has_wildcard,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub raw: String,
    pub terms: Vec<String>,
    pub filters: Vec<FieldFilter>,
    /// Recognized filters whose value has not been typed yet (`type:`).
    pub pending: Vec<String>,
    /// Set by a term made only of `*`.
    pub match_all: bool,
}

impl Query {
    /// True when the query imposes no constraint and selects nothing.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty() && self.filters.is_empty() && !self.match_all
    }
}

pub fn contains_wildcard(value: &str) -> bool {
    value.contains(WILDCARD_CHARS)
}

pub fn parse(raw: &str) -> Query {
    let mut query = Query {
        raw: raw.to_string(),
        ..Default::default()
    };
    for token in raw.split_whitespace() {
        match classify_token(token) {
            Token::Filter(filter) => query.filters.push(filter),
            Token::Pending => query.pending.push(token.to_string()),
            Token::MatchAll => query.match_all = true,
            Token::Term => query.terms.push(token.to_string()),
        }
    }
    query
}

enum Token {
    Filter(FieldFilter),
    Pending,
    MatchAll,
    Term,
}

fn classify_token(token: &str) -> Token {
    if token.chars().all(|ch| ch == '*') {
        return Token::MatchAll;
    }
    let Some((prefix, value)) = token.split_once(':') else {
        return Token::Term;
    };
    let Some(field) = FilterField::from_prefix(prefix) else {
        return Token::Term;
    };
    if value.is_empty() {
        return Token::Pending;
    }
    match field {
        FilterField::Tag => classify_tag(value),
        FilterField::Type => Token::Filter(FieldFilter::new(
            field,
            None,
            expand_type_alias(value).to_string(),
        )),
        FilterField::Location | FilterField::ResourceGroup => {
            Token::Filter(FieldFilter::new(field, None, value.to_string()))
        }
    }
}

fn classify_tag(body: &str) -> Token {
    match body.split_once('=') {
        Some(("", _)) => Token::Term,
        Some((_, "")) => Token::Pending,
        Some((key, value)) => Token::Filter(FieldFilter::new(
            FilterField::Tag,
            Some(key.to_string()),
            value.to_string(),
        )),
        // `tag:env` selects every resource carrying the key.
        None => Token::Filter(FieldFilter::new(
            FilterField::Tag,
            Some(body.to_string()),
            "*".to_string(),
        )),
    }
}

fn expand_type_alias(value: &str) -> &str {
    TYPE_ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(value))
        .map_or(value, |&(_, full)| full)
}
