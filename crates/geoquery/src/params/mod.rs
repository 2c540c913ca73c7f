//! Request parameters.
//!
//! A [`ParameterSet`] is the finished set of key/value pairs handed to the
//! transport. [`BaseParams`] holds the parameters a caller sets explicitly and
//! [`ParameterAggregator`] merges them with everything the facet and
//! expression registries contribute.

use std::{
    borrow::Cow,
    collections::{BTreeMap, btree_map},
    fmt,
};

mod aggregate;
mod base;
pub mod grammar;

pub use aggregate::ParameterAggregator;
pub use base::{BaseParams, DEFAULT_PAGE_SIZE, DEFAULT_RANK, DEFAULT_RESULTS_TYPE};
pub use grammar::validate_name;

/// A single parameter value.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Text(String),
    Number(i64),
}

impl ParamValue {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<i64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(_) => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        Self::Text(value.clone())
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for ParamValue {
    fn from(value: i32) -> Self {
        Self::Number(i64::from(value))
    }
}

impl From<u32> for ParamValue {
    fn from(value: u32) -> Self {
        Self::Number(i64::from(value))
    }
}

/// Request parameters, ordered by name.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterSet {
    entries: BTreeMap<String, ParamValue>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a parameter, returning the previous value.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Option<ParamValue> {
        self.entries.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.entries.get(name)
    }

    /// Text form of a parameter value.
    pub fn get_text(&self, name: &str) -> Option<Cow<'_, str>> {
        self.entries.get(name).map(ParamValue::as_text)
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.entries.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Merge `other` into this set. Colliding names take `other`'s value.
    pub fn merge(&mut self, other: Self) {
        self.entries.extend(other.entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ParamValue> {
        self.entries.iter()
    }

    /// Parameters as text pairs, ready for a query string.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.to_string()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a ParameterSet {
    type Item = (&'a String, &'a ParamValue);
    type IntoIter = btree_map::Iter<'a, String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for ParameterSet {
    type Item = (String, ParamValue);
    type IntoIter = btree_map::IntoIter<String, ParamValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for ParameterSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<ParamValue>> Extend<(K, V)> for ParameterSet {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        self.entries
            .extend(iter.into_iter().map(|(k, v)| (k.into(), v.into())));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_overwrite() {
        let mut params = ParameterSet::new();
        assert!(params.insert("size", 10).is_none());
        assert_eq!(params.insert("size", 20), Some(ParamValue::Number(10)));
        assert_eq!(params.get("size").and_then(ParamValue::as_number), Some(20));
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn test_merge_prefers_incoming() {
        let mut base: ParameterSet = [("q", "coffee"), ("rank", "-text_relevance")].into_iter().collect();
        let other: ParameterSet = [("rank", "geo")].into_iter().collect();
        base.merge(other);

        assert_eq!(base.get_text("rank").as_deref(), Some("geo"));
        assert_eq!(base.get_text("q").as_deref(), Some("coffee"));
    }

    #[test]
    fn test_query_pairs_are_sorted_text() {
        let mut params = ParameterSet::new();
        params.insert("start", 0);
        params.insert("q", "tea");
        params.insert("facet", "state,city");

        assert_eq!(
            params.to_query_pairs(),
            vec![
                ("facet".to_string(), "state,city".to_string()),
                ("q".to_string(), "tea".to_string()),
                ("start".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn test_value_helpers() {
        assert!(ParamValue::from("").is_empty());
        assert!(!ParamValue::from(0).is_empty());
        assert_eq!(ParamValue::from(42u32).as_text(), "42");
        assert_eq!(ParamValue::from("x").as_number(), None);
    }
}
