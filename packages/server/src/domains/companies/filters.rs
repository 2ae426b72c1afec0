//! Filter schema shared by structured search and natural-language search
//!
//! The set of recognized keys is closed: `name, industry, country, region,
//! size, founded, product, location, sort`. Anything else is dropped during
//! validation and never reaches the record store.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys accepted by [`FilterSet::validate`].
pub const FILTER_KEYS: &[&str] = &[
    "name", "industry", "country", "region", "size", "founded", "product", "location", "sort",
];

// =============================================================================
// Size buckets
// =============================================================================

/// Employee-count bucket as stored on company records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompanySize {
    #[serde(rename = "1-10")]
    Micro,
    #[serde(rename = "11-50")]
    Small,
    #[serde(rename = "51-200")]
    Medium,
    #[serde(rename = "201-500")]
    MidMarket,
    #[serde(rename = "501-1000")]
    Large,
    #[serde(rename = "1001-5000")]
    Enterprise,
    #[serde(rename = "5001-10000")]
    BigEnterprise,
    #[serde(rename = "10001+")]
    Giant,
}

impl CompanySize {
    pub const ALL: [CompanySize; 8] = [
        Self::Micro,
        Self::Small,
        Self::Medium,
        Self::MidMarket,
        Self::Large,
        Self::Enterprise,
        Self::BigEnterprise,
        Self::Giant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Micro => "1-10",
            Self::Small => "11-50",
            Self::Medium => "51-200",
            Self::MidMarket => "201-500",
            Self::Large => "501-1000",
            Self::Enterprise => "1001-5000",
            Self::BigEnterprise => "5001-10000",
            Self::Giant => "10001+",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL.into_iter().find(|size| size.as_str() == raw)
    }
}

impl fmt::Display for CompanySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Record fields a result page can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Name,
    Industry,
    Country,
    Region,
    Size,
    Founded,
    Locality,
}

impl SortField {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "name" => Some(Self::Name),
            "industry" => Some(Self::Industry),
            "country" => Some(Self::Country),
            "region" => Some(Self::Region),
            "size" => Some(Self::Size),
            "founded" => Some(Self::Founded),
            "locality" => Some(Self::Locality),
            _ => None,
        }
    }

    /// Column name in the `companies` table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Industry => "industry",
            Self::Country => "country",
            Self::Region => "region",
            Self::Size => "size",
            Self::Founded => "founded",
            Self::Locality => "locality",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// `desc` in any case is descending, everything else ascending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::Name,
            order: SortOrder::Asc,
        }
    }
}

impl SortSpec {
    /// Accepts `{"field": .., "order": ..}` or a bare field name.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(field) => Some(Self {
                field: SortField::parse(field)?,
                order: SortOrder::Asc,
            }),
            Value::Object(map) => {
                let field = SortField::parse(map.get("field")?.as_str()?)?;
                let order = map
                    .get("order")
                    .and_then(Value::as_str)
                    .map(SortOrder::parse)
                    .unwrap_or_default();
                Some(Self { field, order })
            }
            _ => None,
        }
    }
}

// =============================================================================
// Filter set
// =============================================================================

/// A validated set of search constraints. Every field is optional and an
/// empty set means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<CompanySize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
}

impl FilterSet {
    /// Build a filter set from untrusted key/value data.
    ///
    /// Never fails. Unknown keys are dropped, strings are trimmed and blank
    /// ones omitted, `size` must name a known bucket, and `founded` must be a
    /// 4-digit positive year. A value that does not fit is omitted.
    pub fn validate(raw: &Map<String, Value>) -> Self {
        let text = |key: &str| raw.get(key).and_then(trimmed_string);

        Self {
            name: text("name"),
            industry: text("industry"),
            country: text("country"),
            region: text("region"),
            size: text("size").as_deref().and_then(CompanySize::parse),
            founded: raw.get("founded").and_then(parse_year),
            product: text("product"),
            location: text("location"),
            sort: raw.get("sort").and_then(SortSpec::from_value),
        }
    }

    /// Build a filter set from URL query parameters.
    ///
    /// Sorting is given as `sort_field` / `sort_order`; every other key goes
    /// through [`FilterSet::validate`] unchanged.
    pub fn from_query_params(params: &HashMap<String, String>) -> Self {
        let mut raw: Map<String, Value> = params
            .iter()
            .filter(|(key, _)| FILTER_KEYS.contains(&key.as_str()) && key.as_str() != "sort")
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();

        if let Some(field) = params.get("sort_field") {
            let mut sort = Map::new();
            sort.insert("field".into(), Value::String(field.clone()));
            if let Some(order) = params.get("sort_order") {
                sort.insert("order".into(), Value::String(order.clone()));
            }
            raw.insert("sort".into(), Value::Object(sort));
        }

        Self::validate(&raw)
    }

    /// True when no constraint and no sort is set.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Sort to apply, falling back to name ascending.
    pub fn sort_or_default(&self) -> SortSpec {
        self.sort.unwrap_or_default()
    }
}

fn trimmed_string(value: &Value) -> Option<String> {
    let trimmed = value.as_str()?.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_year(value: &Value) -> Option<i32> {
    let year = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => {
                let f = n.as_f64()?;
                if f.fract() != 0.0 {
                    return None;
                }
                f as i64
            }
        },
        Value::String(s) => {
            let s = s.trim();
            if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            s.parse().ok()?
        }
        _ => return None,
    };

    (1000..=9999).contains(&year).then_some(year as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(value: Value) -> FilterSet {
        match value {
            Value::Object(map) => FilterSet::validate(&map),
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_unknown_keys_are_dropped() {
        let filters = validate(json!({
            "industry": "fintech",
            "$where": "1 == 1",
            "ceo": "someone"
        }));

        assert_eq!(
            filters,
            FilterSet {
                industry: Some("fintech".into()),
                ..Default::default()
            }
        );
        assert_eq!(
            serde_json::to_value(&filters).unwrap(),
            json!({"industry": "fintech"})
        );
    }

    #[test]
    fn test_strings_are_trimmed_and_blanks_omitted() {
        let filters = validate(json!({
            "name": "  Acme ",
            "country": "   ",
            "region": 42
        }));

        assert_eq!(filters.name.as_deref(), Some("Acme"));
        assert_eq!(filters.country, None);
        assert_eq!(filters.region, None);
    }

    #[test]
    fn test_founded_coercion() {
        assert_eq!(validate(json!({"founded": 2015})).founded, Some(2015));
        assert_eq!(validate(json!({"founded": "1998"})).founded, Some(1998));
        assert_eq!(validate(json!({"founded": " 2001 "})).founded, Some(2001));
        assert_eq!(validate(json!({"founded": 2015.0})).founded, Some(2015));

        assert_eq!(validate(json!({"founded": "around 2015"})).founded, None);
        assert_eq!(validate(json!({"founded": 15})).founded, None);
        assert_eq!(validate(json!({"founded": -2015})).founded, None);
        assert_eq!(validate(json!({"founded": 2015.5})).founded, None);
        assert_eq!(validate(json!({"founded": "20150"})).founded, None);
        assert_eq!(validate(json!({"founded": true})).founded, None);
    }

    #[test]
    fn test_size_must_be_a_known_bucket() {
        assert_eq!(
            validate(json!({"size": "51-200"})).size,
            Some(CompanySize::Medium)
        );
        assert_eq!(
            validate(json!({"size": " 10001+ "})).size,
            Some(CompanySize::Giant)
        );
        assert_eq!(validate(json!({"size": "about fifty"})).size, None);
    }

    #[test]
    fn test_size_round_trips_through_bucket_strings() {
        for size in CompanySize::ALL {
            assert_eq!(CompanySize::parse(size.as_str()), Some(size));
            assert_eq!(
                serde_json::to_value(size).unwrap(),
                Value::String(size.as_str().into())
            );
        }
    }

    #[test]
    fn test_sort_object_and_bare_string() {
        assert_eq!(
            validate(json!({"sort": {"field": "founded", "order": "DESC"}})).sort,
            Some(SortSpec {
                field: SortField::Founded,
                order: SortOrder::Desc
            })
        );
        assert_eq!(
            validate(json!({"sort": "industry"})).sort,
            Some(SortSpec {
                field: SortField::Industry,
                order: SortOrder::Asc
            })
        );
        assert_eq!(
            validate(json!({"sort": {"field": "country", "order": "sideways"}})).sort,
            Some(SortSpec {
                field: SortField::Country,
                order: SortOrder::Asc
            })
        );
    }

    #[test]
    fn test_sort_on_unknown_field_is_dropped() {
        assert_eq!(validate(json!({"sort": {"field": "ai_summary"}})).sort, None);
        assert_eq!(validate(json!({"sort": 3})).sort, None);
    }

    #[test]
    fn test_from_query_params() {
        let params: HashMap<String, String> = [
            ("industry", "bank"),
            ("founded", "2010"),
            ("sort_field", "name"),
            ("sort_order", "desc"),
            ("page", "2"),
            ("sort", "ignored"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let filters = FilterSet::from_query_params(&params);

        assert_eq!(filters.industry.as_deref(), Some("bank"));
        assert_eq!(filters.founded, Some(2010));
        assert_eq!(
            filters.sort,
            Some(SortSpec {
                field: SortField::Name,
                order: SortOrder::Desc
            })
        );
    }

    #[test]
    fn test_empty_and_default_sort() {
        let filters = FilterSet::default();
        assert!(filters.is_empty());
        assert_eq!(filters.sort_or_default(), SortSpec::default());
        assert!(!validate(json!({"location": "Berlin"})).is_empty());
    }
}
