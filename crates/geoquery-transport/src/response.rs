//! Typed search response payloads.
//!
//! Only the parts of the response consumed downstream are modelled: the hit
//! list with its returned fields, facet counts and the request info block.
//! Unknown keys are ignored.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const DEFAULT_FIELD_DELIMITER: &str = ", ";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResponse {
    pub rank: Option<String>,
    #[serde(rename = "match-expr")]
    pub match_expr: Option<String>,
    pub hits: Hits,
    pub facets: BTreeMap<String, FacetResult>,
    pub info: Option<ResponseInfo>,
}

impl SearchResponse {
    pub fn from_json(body: &str) -> Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Facet counts for one field, if the backend returned any.
    pub fn facet(&self, field: &str) -> Option<&FacetResult> {
        self.facets.get(field)
    }

    pub fn documents(&self) -> &[Document] {
        &self.hits.hit
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Hits {
    pub found: u64,
    pub start: u64,
    pub hit: Vec<Document>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacetResult {
    pub constraints: Vec<FacetConstraint>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetConstraint {
    pub value: String,
    pub count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResponseInfo {
    pub rid: Option<String>,
    #[serde(rename = "time-ms")]
    pub time_ms: Option<u64>,
    #[serde(rename = "cpu-time-ms")]
    pub cpu_time_ms: Option<u64>,
}

/// A single hit and the fields requested through `return-fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Document {
    pub id: String,
    pub data: BTreeMap<String, Vec<String>>,
}

impl Document {
    /// Values of a returned field. Missing and empty fields are both `None`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.data
            .get(key)
            .map(Vec::as_slice)
            .filter(|values| !values.is_empty())
    }

    /// First value of a returned field.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(|values| values.first()).map(String::as_str)
    }

    /// Values of a returned field, or `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a [String]) -> &'a [String] {
        self.get(key).unwrap_or(default)
    }

    /// Field values joined with `delimiter` (defaults to `", "`). Absent
    /// fields give an empty string.
    pub fn get_string(&self, key: &str, delimiter: Option<&str>) -> String {
        let delimiter = delimiter.unwrap_or(DEFAULT_FIELD_DELIMITER);
        self.get(key)
            .map(|values| values.iter().join(delimiter))
            .unwrap_or_default()
    }
}
