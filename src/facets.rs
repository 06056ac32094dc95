//! Facet counts parsed from a Solr `facet_counts` block.
//!
//! Solr may encode each field facet as a flat list alternating values and
//! counts (`["Book", 10, "Journal", 3]`, the default `json.nl=flat`), as a list
//! of pairs (`json.nl=arrarr`), or as an object (`json.nl=map`). All three are
//! read into the same ordered representation.

use indexmap::IndexMap;
use serde_json::Value;

/// A single facet value and the number of records carrying it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCount {
    /// Facet value as indexed
    pub value: String,
    /// Number of matching records
    pub count: u64,
}

/// Facet information of one search response.
///
/// Field order and value order follow the engine's response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    fields: IndexMap<String, Vec<FacetCount>>,
    queries: IndexMap<String, u64>,
}

impl Facets {
    /// Parse a `facet_counts` value. Unknown or malformed parts are skipped.
    #[must_use]
    pub fn new(facet_counts: &Value) -> Self {
        let mut facets = Facets::default();

        if let Some(fields) = facet_counts.get("facet_fields").and_then(Value::as_object) {
            for (name, values) in fields {
                facets
                    .fields
                    .insert(name.clone(), parse_field_values(values));
            }
        }

        if let Some(queries) = facet_counts
            .get("facet_queries")
            .and_then(Value::as_object)
        {
            for (query, count) in queries {
                if let Some(count) = as_count(count) {
                    facets.queries.insert(query.clone(), count);
                }
            }
        }

        facets
    }

    /// All field facets.
    #[must_use]
    pub fn field_facets(&self) -> &IndexMap<String, Vec<FacetCount>> {
        &self.fields
    }

    /// Values of one field facet, if the response had it.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&[FacetCount]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// All query facets (`facet.query` expression to count).
    #[must_use]
    pub fn query_facets(&self) -> &IndexMap<String, u64> {
        &self.queries
    }

    /// True if neither field nor query facets are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.queries.is_empty()
    }
}

fn parse_field_values(values: &Value) -> Vec<FacetCount> {
    match values {
        Value::Array(items) if items.iter().all(Value::is_array) => items
            .iter()
            .filter_map(|pair| {
                let pair = pair.as_array()?;
                Some(FacetCount {
                    value: as_facet_value(pair.first()?),
                    count: as_count(pair.get(1)?)?,
                })
            })
            .collect(),
        Value::Array(items) => items
            .chunks(2)
            .filter_map(|chunk| match chunk {
                [value, count] => Some(FacetCount {
                    value: as_facet_value(value),
                    count: as_count(count)?,
                }),
                _ => None,
            })
            .collect(),
        Value::Object(map) => map
            .iter()
            .filter_map(|(value, count)| {
                Some(FacetCount {
                    value: value.clone(),
                    count: as_count(count)?,
                })
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn as_facet_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn as_count(value: &Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flat_list_form() {
        let facets = Facets::new(&json!({
            "facet_fields": {"format": ["Book", 10, "Journal", 3]}
        }));
        let format = facets.field("format").unwrap();
        assert_eq!(format.len(), 2);
        assert_eq!(format[0].value, "Book");
        assert_eq!(format[0].count, 10);
        assert_eq!(format[1].value, "Journal");
    }

    #[test]
    fn test_pair_and_map_forms() {
        let facets = Facets::new(&json!({
            "facet_fields": {
                "language": [["English", 7], ["German", 2]],
                "building": {"Main": 4}
            },
            "facet_queries": {"publishDate:[2000 TO *]": 5}
        }));
        assert_eq!(facets.field("language").unwrap()[1].value, "German");
        assert_eq!(facets.field("building").unwrap()[0].count, 4);
        assert_eq!(facets.query_facets()["publishDate:[2000 TO *]"], 5);
        let names: Vec<&String> = facets.field_facets().keys().collect();
        assert_eq!(names, vec!["language", "building"]);
    }

    #[test]
    fn test_empty_and_malformed() {
        assert!(Facets::new(&json!({})).is_empty());
        let facets = Facets::new(&json!({"facet_fields": {"odd": ["dangling"]}}));
        assert!(facets.field("odd").unwrap().is_empty());
    }
}
