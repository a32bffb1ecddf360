/*!
# Resource Search

In-memory search over a snapshot of cloud resources, re-evaluated on every
keystroke of the dashboard's search box.

## Pipeline

```text
snapshot ──> IndexGeneration (built unlocked, swapped atomically)
query    ──> parse ──> matcher (raw field hits) ──> scorer (one ranked result per resource)
partial  ──> suggestion table (prefix, frequency, length)
```

## Query syntax

```text
<term>              case-insensitive substring over name, type, location, rg and tag values
type:<value>        resource type filter (short aliases such as `vm`, `vnet`, `nsg`)
location:<value>    location filter
rg:<value>          resource-group filter
tag:<key>=<value>   tag filter; `tag:<key>` matches any value
*, ?                wildcards inside any term or filter value
```

Tokens combine with AND semantics. Parsing never fails: unknown prefixes are
kept as free text.

## Example

```rust
use cloudnav_resource_search::Resource;
use cloudnav_resource_search::SearchEngine;

let engine = SearchEngine::default();
engine.set_resources(vec![
    Resource::new("vm-1", "web-vm-01", "Microsoft.Compute/virtualMachines", "eastus")
        .with_tag("env", "prod"),
]);

let results = engine.search("type:vm tag:env=prod").unwrap_or_default();
assert_eq!(results[0].name, "web-vm-01");
assert!(engine.suggestions("w").is_empty());
```
*/

mod cache;
mod config;
mod engine;
mod error;
mod index;
mod matcher;
mod model;
mod pattern;
pub mod query;
mod scorer;
mod suggest;

pub use config::EXACT_MATCH_WEIGHT;
pub use config::FIELD_FILTER_WEIGHT;
pub use config::PREFIX_MATCH_WEIGHT;
pub use config::SECONDARY_FIELD_MULTIPLIER;
pub use config::SUBSTRING_MATCH_WEIGHT;
pub use config::ScoreWeights;
pub use config::SearchConfig;
pub use engine::SearchEngine;
pub use error::Result;
pub use error::SearchError;
pub use index::IndexGeneration;
pub use index::IndexStats;
pub use model::FieldMatch;
pub use model::MatchKind;
pub use model::MatchType;
pub use model::PropertyValue;
pub use model::Resource;
pub use model::SearchResult;
pub use query::FieldFilter;
pub use query::FilterField;
pub use query::Query;
pub use query::parse;
pub use suggest::TokenSource;
