use serde::Deserialize;
use serde::Serialize;
use serde_with::DefaultOnNull;
use serde_with::serde_as;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;

/// A cloud resource as delivered by the inventory provider.
///
/// Field names follow the camelCase shape printed by `az resource list`, so a
/// snapshot captured from the CLI deserializes directly.
#[serde_as]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub location: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub resource_group: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub tags: HashMap<String, String>,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyValue>,
}

impl Resource {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        resource_type: impl Into<String>,
        location: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            resource_type: resource_type.into(),
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn with_resource_group(mut self, resource_group: impl Into<String>) -> Self {
        self.resource_group = resource_group.into();
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }
}

/// Opaque provider payload attached to a resource.
///
/// Only ever rendered through [`fmt::Display`]; matching and ranking never
/// look inside it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    #[default]
    Null,
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
    List(Vec<PropertyValue>),
    Map(BTreeMap<String, PropertyValue>),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => Ok(()),
            PropertyValue::Bool(value) => write!(f, "{value}"),
            PropertyValue::Number(value) => write!(f, "{value}"),
            PropertyValue::Text(value) => f.write_str(value),
            PropertyValue::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            PropertyValue::Map(entries) => {
                f.write_str("{")?;
                for (idx, (key, value)) in entries.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
        }
    }
}

/// Resource field that produced a search hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Name,
    Type,
    Location,
    ResourceGroup,
    Tag,
}

impl MatchType {
    pub const ALL: [MatchType; 5] = [
        MatchType::Name,
        MatchType::Type,
        MatchType::Location,
        MatchType::ResourceGroup,
        MatchType::Tag,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MatchType::Name => "name",
            MatchType::Type => "type",
            MatchType::Location => "location",
            MatchType::ResourceGroup => "resource group",
            MatchType::Tag => "tag",
        }
    }

    /// Tags are secondary metadata and rank below the primary fields.
    pub fn is_secondary(self) -> bool {
        matches!(self, MatchType::Tag)
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How a single value matched; drives the weight table in the scorer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    FieldFilter,
    Prefix,
    Substring,
}

/// One deduplicated field hit of a ranked result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FieldMatch {
    pub match_type: MatchType,
    pub match_value: String,
    pub kind: MatchKind,
    pub score: f32,
}

/// A ranked resource.
///
/// `match_type`/`match_value` describe the strongest hit; `matches` lists every
/// field that contributed to `score`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub resource_id: String,
    pub name: String,
    pub match_type: MatchType,
    pub match_value: String,
    pub score: f32,
    pub matches: Vec<FieldMatch>,
}
