use crate::model::MatchType;
use crate::model::Resource;
use crate::suggest::SuggestionTable;
use serde::Serialize;
use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::ops::Range;
use tracing::warn;

pub(crate) type PositionSet = BTreeSet<usize>;

/// One searchable (resource, field, value) triple.
#[derive(Debug, Clone)]
pub(crate) struct FieldTuple {
    pub resource: usize,
    pub field: MatchType,
    /// Lowercased tag key for [`MatchType::Tag`] tuples.
    pub key: Option<String>,
    /// Display form: the raw value, or `key=value` for tags.
    pub display: String,
    pub value_lower: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub generation: u64,
    pub resources: usize,
    pub tuples: usize,
    pub tokens: usize,
}

/// One immutable, fully built set of lookup structures.
#[derive(Debug, Default)]
pub struct IndexGeneration {
    generation: u64,
    resources: Vec<Resource>,
    positions: HashMap<String, usize>,
    exact: HashMap<MatchType, HashMap<String, PositionSet>>,
    tags: HashMap<String, HashMap<String, PositionSet>>,
    /// Field-major, so every field owns one contiguous range.
    tuples: Vec<FieldTuple>,
    field_ranges: HashMap<MatchType, Range<usize>>,
    suggestions: SuggestionTable,
}

impl IndexGeneration {
    pub(crate) fn build(generation: u64, snapshot: Vec<Resource>) -> Self {
        let mut resources = Vec::with_capacity(snapshot.len());
        let mut positions = HashMap::with_capacity(snapshot.len());
        for resource in snapshot {
            match positions.entry(resource.id.clone()) {
                Entry::Occupied(_) => {
                    warn!(id = %resource.id, "duplicate resource id in snapshot; keeping first");
                }
                Entry::Vacant(slot) => {
                    slot.insert(resources.len());
                    resources.push(resource);
                }
            }
        }

        let mut exact: HashMap<MatchType, HashMap<String, PositionSet>> = HashMap::new();
        let mut tags: HashMap<String, HashMap<String, PositionSet>> = HashMap::new();
        let mut tuples = Vec::new();
        let mut field_ranges = HashMap::new();

        for field in MatchType::ALL {
            let start = tuples.len();
            for (position, resource) in resources.iter().enumerate() {
                if field == MatchType::Tag {
                    let mut pairs: Vec<(&String, &String)> = resource.tags.iter().collect();
                    pairs.sort();
                    for (key, value) in pairs {
                        let key_lower = key.to_lowercase();
                        let value_lower = value.to_lowercase();
                        tags.entry(key_lower.clone())
                            .or_default()
                            .entry(value_lower.clone())
                            .or_default()
                            .insert(position);
                        tuples.push(FieldTuple {
                            resource: position,
                            field,
                            key: Some(key_lower),
                            display: format!("{key}={value}"),
                            value_lower,
                        });
                    }
                    continue;
                }
                let value = field_value(resource, field);
                if value.is_empty() {
                    continue;
                }
                let value_lower = value.to_lowercase();
                exact
                    .entry(field)
                    .or_default()
                    .entry(value_lower.clone())
                    .or_default()
                    .insert(position);
                tuples.push(FieldTuple {
                    resource: position,
                    field,
                    key: None,
                    display: value.to_string(),
                    value_lower,
                });
            }
            field_ranges.insert(field, start..tuples.len());
        }

        let suggestions = SuggestionTable::build(&resources);

        Self {
            generation,
            resources,
            positions,
            exact,
            tags,
            tuples,
            field_ranges,
            suggestions,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, position: usize) -> Option<&Resource> {
        self.resources.get(position)
    }

    pub fn resource_by_id(&self, id: &str) -> Option<&Resource> {
        self.positions
            .get(id)
            .and_then(|position| self.resources.get(*position))
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            generation: self.generation,
            resources: self.resources.len(),
            tuples: self.tuples.len(),
            tokens: self.suggestions.len(),
        }
    }

    pub(crate) fn all_positions(&self) -> PositionSet {
        (0..self.resources.len()).collect()
    }

    pub(crate) fn tuples_for(&self, field: MatchType) -> &[FieldTuple] {
        self.field_ranges
            .get(&field)
            .and_then(|range| self.tuples.get(range.clone()))
            .unwrap_or(&[])
    }

    /// `value_lower` must already be lowercased.
    pub(crate) fn exact_lookup(&self, field: MatchType, value_lower: &str) -> Option<&PositionSet> {
        self.exact
            .get(&field)
            .and_then(|values| values.get(value_lower))
    }

    /// Both arguments must already be lowercased.
    pub(crate) fn tag_lookup(&self, key_lower: &str, value_lower: &str) -> Option<&PositionSet> {
        self.tags
            .get(key_lower)
            .and_then(|values| values.get(value_lower))
    }

    pub(crate) fn suggestions(&self) -> &SuggestionTable {
        &self.suggestions
    }
}

pub(crate) fn field_value(resource: &Resource, field: MatchType) -> &str {
    match field {
        MatchType::Name => &resource.name,
        MatchType::Type => &resource.resource_type,
        MatchType::Location => &resource.location,
        MatchType::ResourceGroup => &resource.resource_group,
        MatchType::Tag => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Vec<Resource> {
        vec![
            Resource::new("id-1", "web-vm-01", "Microsoft.Compute/virtualMachines", "eastus")
                .with_resource_group("rg-web")
                .with_tag("env", "prod")
                .with_tag("Owner", "Ops"),
            Resource::new("id-2", "web-vm-02", "Microsoft.Compute/virtualMachines", "westus")
                .with_tag("env", "dev"),
        ]
    }

    #[test]
    fn builds_exact_maps_per_field() {
        let index = IndexGeneration::build(7, sample());
        assert_eq!(index.generation(), 7);
        let vms = index
            .exact_lookup(MatchType::Type, "microsoft.compute/virtualmachines")
            .cloned()
            .unwrap_or_default();
        assert_eq!(vms, PositionSet::from([0, 1]));
        assert_eq!(
            index.exact_lookup(MatchType::Location, "eastus"),
            Some(&PositionSet::from([0]))
        );
        assert_eq!(index.tag_lookup("owner", "ops"), Some(&PositionSet::from([0])));
        assert_eq!(index.exact_lookup(MatchType::ResourceGroup, ""), None);
    }

    #[test]
    fn tuples_are_grouped_by_field() {
        let index = IndexGeneration::build(1, sample());
        let names: Vec<&str> = index
            .tuples_for(MatchType::Name)
            .iter()
            .map(|tuple| tuple.display.as_str())
            .collect();
        assert_eq!(names, vec!["web-vm-01", "web-vm-02"]);
        // The second resource has no resource group, so it contributes no tuple.
        assert_eq!(index.tuples_for(MatchType::ResourceGroup).len(), 1);
        let tags: Vec<&str> = index
            .tuples_for(MatchType::Tag)
            .iter()
            .map(|tuple| tuple.display.as_str())
            .collect();
        assert_eq!(tags, vec!["Owner=Ops", "env=prod", "env=dev"]);
        assert_eq!(index.stats().tuples, 2 + 2 + 2 + 1 + 3);
    }

    #[test]
    fn duplicate_ids_keep_first_record() {
        let mut resources = sample();
        resources.push(Resource::new("id-1", "shadow", "Microsoft.Web/sites", "eastus"));
        let index = IndexGeneration::build(1, resources);
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.resource_by_id("id-1").map(|r| r.name.as_str()),
            Some("web-vm-01")
        );
    }

    #[test]
    fn empty_snapshot_builds_empty_generation() {
        let index = IndexGeneration::build(3, Vec::new());
        assert!(index.is_empty());
        assert!(index.tuples_for(MatchType::Name).is_empty());
        assert_eq!(index.stats().generation, 3);
    }
}
