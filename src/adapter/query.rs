//! Query string parsing.
//!
//! Mirrors what web frameworks hand to RPC handlers: a flat map where a key
//! seen once is a string and a key seen several times is a list.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// Parsed query mapping, keyed by parameter name.
pub type QueryMap = BTreeMap<String, QueryValue>;

/// A single query parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    /// The value when the key appeared exactly once.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Single(value) => Some(value),
            QueryValue::Multi(_) => None,
        }
    }

    /// All values in order of appearance.
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(value) => vec![value.as_str()],
            QueryValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            QueryValue::Single(first) => {
                let first = std::mem::take(first);
                *self = QueryValue::Multi(vec![first, value]);
            }
            QueryValue::Multi(values) => values.push(value),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

/// Parse a raw query string (with or without the leading `?`).
///
/// Never fails: invalid percent escapes are decoded lossily.
pub fn parse_query(raw: Option<&str>) -> QueryMap {
    let mut query = QueryMap::new();
    let Some(raw) = raw else {
        return query;
    };
    let raw = raw.strip_prefix('?').unwrap_or(raw);

    for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
        match query.entry(key.into_owned()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(value.into_owned()),
            Entry::Vacant(entry) => {
                entry.insert(QueryValue::Single(value.into_owned()));
            }
        }
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_query_is_empty() {
        assert!(parse_query(None).is_empty());
        assert!(parse_query(Some("")).is_empty());
        assert!(parse_query(Some("?")).is_empty());
    }

    #[test]
    fn test_single_values() {
        let query = parse_query(Some("limit=10&cursor=abc"));
        assert_eq!(query.len(), 2);
        assert_eq!(query["limit"], QueryValue::from("10"));
        assert_eq!(query["cursor"].as_str(), Some("abc"));
    }

    #[test]
    fn test_leading_question_mark() {
        let query = parse_query(Some("?limit=10"));
        assert_eq!(query["limit"].as_str(), Some("10"));
    }

    #[test]
    fn test_repeated_keys_collect() {
        let query = parse_query(Some("id=1&id=2&id=3"));
        assert_eq!(
            query["id"],
            QueryValue::Multi(vec!["1".into(), "2".into(), "3".into()])
        );
        assert_eq!(query["id"].as_str(), None);
        assert_eq!(query["id"].values(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_decoding() {
        let query = parse_query(Some("name=Jane+Doe&tag=a%2Fb&flag"));
        assert_eq!(query["name"].as_str(), Some("Jane Doe"));
        assert_eq!(query["tag"].as_str(), Some("a/b"));
        assert_eq!(query["flag"].as_str(), Some(""));
    }

    #[test]
    fn test_serializes_flat() {
        let query = parse_query(Some("limit=10&id=1&id=2"));
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({ "limit": "10", "id": ["1", "2"] }));
    }
}
