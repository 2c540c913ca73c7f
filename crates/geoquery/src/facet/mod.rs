//! Facet configuration.
//!
//! A facet asks the backend to count matches per value of a field. Each
//! [`Facet`] carries the values to report (constraints), how many values to
//! return and how to sort them; [`FacetRegistry`] keeps one facet per field
//! and serializes them into request parameters.

use std::fmt;

use itertools::Itertools;
use tracing::{debug, trace};

use crate::params::{ParameterSet, grammar};

mod registry;

pub use error::FacetError;
pub use registry::FacetRegistry;

/// How facet values are ordered in the response.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    /// Alphabetically by value
    Alpha,
    /// By number of matches
    Count,
    /// By the maximum value of the field
    Max,
    /// By the sum of the field
    Sum,
}

impl SortMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alpha => "alpha",
            Self::Count => "count",
            Self::Max => "max",
            Self::Sum => "sum",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraint values, either one comma-delimited string or a list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintValues {
    Delimited(String),
    List(Vec<String>),
}

impl ConstraintValues {
    /// Trimmed, non-empty tokens in input order.
    pub fn tokens(&self) -> Vec<String> {
        let raw: Vec<&str> = match self {
            Self::Delimited(s) => s.split(',').collect(),
            Self::List(values) => values.iter().map(String::as_str).collect(),
        };
        raw.into_iter()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(ToString::to_string)
            .collect()
    }
}

impl From<&str> for ConstraintValues {
    fn from(value: &str) -> Self {
        Self::Delimited(value.to_string())
    }
}

impl From<String> for ConstraintValues {
    fn from(value: String) -> Self {
        Self::Delimited(value)
    }
}

impl From<Vec<String>> for ConstraintValues {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

impl From<Vec<&str>> for ConstraintValues {
    fn from(value: Vec<&str>) -> Self {
        Self::List(value.into_iter().map(ToString::to_string).collect())
    }
}

impl From<&[&str]> for ConstraintValues {
    fn from(value: &[&str]) -> Self {
        Self::List(value.iter().map(ToString::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ConstraintValues {
    fn from(value: [&str; N]) -> Self {
        Self::List(value.iter().map(ToString::to_string).collect())
    }
}

/// Full description of a facet, used to create one in a single call.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FacetDescriptor {
    pub field: String,
    pub constraints: Vec<String>,
    pub top_n: Option<u32>,
    /// One of `alpha`, `count`, `max`, `sum`, `-max`; anything else is ignored.
    pub sort: Option<String>,
}

impl FacetDescriptor {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            ..Self::default()
        }
    }

    pub fn constraints(mut self, values: impl Into<ConstraintValues>) -> Self {
        self.constraints = values.into().tokens();
        self
    }

    pub fn top_n(mut self, n: u32) -> Self {
        self.top_n = Some(n);
        self
    }

    pub fn sort(mut self, mode: impl Into<String>) -> Self {
        self.sort = Some(mode.into());
        self
    }
}

/// Input accepted by [`FacetRegistry::create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FacetInput {
    Field(String),
    Descriptor(FacetDescriptor),
}

impl FacetInput {
    pub fn field(&self) -> &str {
        match self {
            Self::Field(field) => field,
            Self::Descriptor(descriptor) => &descriptor.field,
        }
    }
}

impl From<&str> for FacetInput {
    fn from(value: &str) -> Self {
        Self::Field(value.to_string())
    }
}

impl From<String> for FacetInput {
    fn from(value: String) -> Self {
        Self::Field(value)
    }
}

impl From<FacetDescriptor> for FacetInput {
    fn from(value: FacetDescriptor) -> Self {
        Self::Descriptor(value)
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    field: String,
    constraints: Vec<String>,
    top_n: Option<u32>,
    sort: Option<SortMode>,
    descending: bool,
}

impl Facet {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraints: Vec::new(),
            top_n: None,
            sort: None,
            descending: false,
        }
    }

    pub(crate) fn from_input(input: FacetInput) -> Self {
        match input {
            FacetInput::Field(field) => Self::new(field.trim()),
            FacetInput::Descriptor(descriptor) => {
                let mut facet = Self::new(descriptor.field.trim());
                facet.add_constraints(descriptor.constraints);
                facet.top_n = descriptor.top_n;
                if let Some(mode) = descriptor.sort.as_deref() {
                    facet.set_sort(mode);
                }
                facet
            }
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn constraints(&self) -> &[String] {
        &self.constraints
    }

    pub fn top_n(&self) -> Option<u32> {
        self.top_n
    }

    pub fn sort(&self) -> Option<SortMode> {
        self.sort
    }

    pub fn is_descending(&self) -> bool {
        self.descending
    }

    /// Add values not already present, keeping insertion order.
    pub fn add_constraints(&mut self, values: impl Into<ConstraintValues>) -> &mut Self {
        for token in values.into().tokens() {
            if !self.constraints.contains(&token) {
                trace!(field = %self.field, constraint = %token, "Constraint added");
                self.constraints.push(token);
            }
        }
        self
    }

    pub fn remove_constraints(&mut self, values: impl Into<ConstraintValues>) -> &mut Self {
        let tokens = values.into().tokens();
        self.constraints.retain(|c| !tokens.contains(c));
        self
    }

    pub fn clear_constraints(&mut self) -> &mut Self {
        self.constraints.clear();
        self
    }

    pub fn set_limit(&mut self, n: u32) -> &mut Self {
        self.top_n = Some(n);
        self
    }

    /// Parse a limit from text; anything but a non-negative integer unsets it.
    pub fn set_limit_str(&mut self, n: &str) -> &mut Self {
        self.top_n = n.trim().parse().ok();
        self
    }

    pub fn clear_limit(&mut self) -> &mut Self {
        self.top_n = None;
        self
    }

    /// Accepts `alpha`, `count`, `max`, `sum` and `-max` (descending max).
    /// Other values leave the sort unchanged.
    pub fn set_sort(&mut self, mode: &str) -> &mut Self {
        let parsed = match mode {
            "alpha" => SortMode::Alpha,
            "count" => SortMode::Count,
            "max" => SortMode::Max,
            "sum" => SortMode::Sum,
            "-max" => {
                self.descending = true;
                SortMode::Max
            }
            _ => {
                debug!(field = %self.field, mode, "Ignoring invalid facet sort mode");
                return self;
            }
        };
        self.sort = Some(parsed);
        self
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) -> &mut Self {
        self.sort = Some(mode);
        self
    }

    pub fn asc(&mut self) -> &mut Self {
        self.descending = false;
        self
    }

    pub fn desc(&mut self) -> &mut Self {
        self.descending = true;
        self
    }

    pub fn sort_by_count(&mut self) -> &mut Self {
        self.set_sort_mode(SortMode::Count)
    }

    pub fn sort_by_name(&mut self) -> &mut Self {
        self.set_sort_mode(SortMode::Alpha)
    }

    pub fn sort_by_value(&mut self, descending: bool) -> &mut Self {
        self.descending = descending;
        self.set_sort_mode(SortMode::Max)
    }

    /// Per-field request parameters. Only set parts are emitted.
    pub fn serialize(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        if !self.constraints.is_empty() {
            params.insert(
                grammar::facet_constraints_key(&self.field),
                self.constraints.iter().join(","),
            );
        }
        if let Some(top_n) = self.top_n {
            params.insert(grammar::facet_top_n_key(&self.field), top_n);
        }
        if let Some(sort) = self.sort {
            let prefix = if self.descending && sort == SortMode::Max {
                "-"
            } else {
                ""
            };
            params.insert(grammar::facet_sort_key(&self.field), format!("{prefix}{sort}"));
        }
        params
    }

    /// Boundary-query filter restricting matches to the constraint values.
    ///
    /// Range values (`a..b`) are used as is, others are quoted.
    pub fn filter_query(&self) -> Option<String> {
        let terms = self
            .constraints
            .iter()
            .map(|value| format!("{}:{}", self.field, quote_constraint(value)))
            .collect::<Vec<_>>();
        match terms.as_slice() {
            [] => None,
            [single] => Some(format!("(and {single})")),
            many => Some(format!("(and (or {}))", many.join(" "))),
        }
    }
}

fn quote_constraint(value: &str) -> String {
    if value.contains("..") {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
    }
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug, PartialEq, Eq)]
    pub enum FacetError {
        #[error("Invalid facet descriptor: {0}")]
        InvalidFacetDescriptor(String),
    }
}
