use itertools::Itertools;
use tracing::debug;

use super::{
    ParamValue, ParameterSet,
    grammar::{self, validate_name},
};

pub const DEFAULT_RESULTS_TYPE: &str = "json";
pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const DEFAULT_RANK: &str = "-text_relevance";

/// Parameters set explicitly by the caller.
///
/// Every write goes through the name grammar; unknown names are refused
/// without touching the stored values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseParams {
    params: ParameterSet,
}

impl Default for BaseParams {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_PAGE_SIZE, DEFAULT_RANK)
    }
}

impl BaseParams {
    /// Start from `results-type=json`, `start=0` and the given page size and rank.
    pub fn with_defaults(size: u32, rank: &str) -> Self {
        let mut params = ParameterSet::new();
        params.insert(grammar::RESULTS_TYPE, DEFAULT_RESULTS_TYPE);
        params.insert(grammar::START, 0);
        params.insert(grammar::SIZE, size);
        params.insert(grammar::RANK, rank);
        Self { params }
    }

    /// No parameters at all.
    pub fn empty() -> Self {
        Self {
            params: ParameterSet::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(&normalize_name(name))
    }

    pub fn all(&self) -> &ParameterSet {
        &self.params
    }

    /// Set a parameter. Returns `false` when the name is not part of the
    /// grammar or the value is refused; nothing is changed in that case.
    ///
    /// `start` and `size` fall back to `0` for negative or non-numeric input.
    pub fn set(&mut self, name: &str, value: impl Into<ParamValue>) -> bool {
        let name = normalize_name(name);
        if !validate_name(&name) {
            debug!(name = %name, "Rejected unknown parameter name");
            return false;
        }

        let value = value.into();
        let normalized = match name.as_str() {
            grammar::QUERY => value,
            grammar::BOUNDARY_QUERY => ParamValue::Text(value.as_text().trim().to_string()),
            grammar::START | grammar::SIZE => ParamValue::Number(non_negative_or_zero(&value)),
            grammar::RESULTS_TYPE => {
                let results_type = value.as_text().trim().to_lowercase();
                if results_type != "json" && results_type != "xml" {
                    debug!(value = %results_type, "Rejected results-type, expected json or xml");
                    return false;
                }
                ParamValue::Text(results_type)
            }
            _ => {
                if value.is_empty() {
                    return false;
                }
                ParamValue::Text(value.as_text().into_owned())
            }
        };
        debug!(name = %name, value = %normalized, "Parameter set");
        self.params.insert(name, normalized);
        true
    }

    /// Returns `true` when a value was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        self.params.remove(&normalize_name(name)).is_some()
    }

    /// Sets `return-fields` to the comma-joined field list.
    pub fn set_return_fields<S: AsRef<str>>(&mut self, fields: &[S]) -> bool {
        let joined = fields
            .iter()
            .map(|f| f.as_ref().trim())
            .filter(|f| !f.is_empty())
            .join(",");
        self.set(grammar::RETURN_FIELDS, joined)
    }

    /// Sets `t-<name>` to the range `from..to`; a `None` bound is open.
    pub fn set_threshold(&mut self, name: &str, from: Option<i64>, to: Option<i64>) -> bool {
        let from = from.map(|v| v.to_string()).unwrap_or_default();
        let to = to.map(|v| v.to_string()).unwrap_or_default();
        self.set(&grammar::threshold_key(name.trim()), format!("{from}..{to}"))
    }
}

fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

fn non_negative_or_zero(value: &ParamValue) -> i64 {
    let parsed = match value {
        ParamValue::Number(n) => Some(*n),
        ParamValue::Text(s) => s.trim().parse::<i64>().ok(),
    };
    parsed.filter(|n| *n >= 0).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = BaseParams::default();
        assert_eq!(params.get("results-type"), Some(&ParamValue::from("json")));
        assert_eq!(params.get("start"), Some(&ParamValue::Number(0)));
        assert_eq!(params.get("size"), Some(&ParamValue::Number(10)));
        assert_eq!(params.get("rank"), Some(&ParamValue::from("-text_relevance")));
        assert!(params.get("q").is_none());
    }

    #[test]
    fn test_rejects_unknown_name() {
        let mut params = BaseParams::default();
        let before = params.clone();
        assert!(!params.set("random", "x"));
        assert!(!params.set("facet-color-bogus", "x"));
        assert_eq!(params, before);
    }

    #[test]
    fn test_name_is_normalized() {
        let mut params = BaseParams::default();
        assert!(params.set("  Q ", "coffee"));
        assert_eq!(params.get("q"), Some(&ParamValue::from("coffee")));
        assert!(params.remove("Q"));
        assert!(!params.remove("q"));
    }

    #[test]
    fn test_start_and_size_fallback() {
        let mut params = BaseParams::default();
        assert!(params.set("start", "20"));
        assert_eq!(params.get("start"), Some(&ParamValue::Number(20)));
        assert!(params.set("start", "-5"));
        assert_eq!(params.get("start"), Some(&ParamValue::Number(0)));
        assert!(params.set("size", "lots"));
        assert_eq!(params.get("size"), Some(&ParamValue::Number(0)));
        assert!(params.set("size", 25));
        assert_eq!(params.get("size"), Some(&ParamValue::Number(25)));
    }

    #[test]
    fn test_results_type() {
        let mut params = BaseParams::default();
        assert!(params.set("results-type", " XML "));
        assert_eq!(params.get("results-type"), Some(&ParamValue::from("xml")));
        assert!(!params.set("results-type", "yaml"));
        assert_eq!(params.get("results-type"), Some(&ParamValue::from("xml")));
    }

    #[test]
    fn test_bq_trimmed_and_empty_values_refused() {
        let mut params = BaseParams::empty();
        assert!(params.set("bq", "  (and genre:'drama')  "));
        assert_eq!(params.get("bq"), Some(&ParamValue::from("(and genre:'drama')")));
        assert!(!params.set("rank", ""));
        assert!(params.get("rank").is_none());
    }

    #[test]
    fn test_return_fields_and_threshold() {
        let mut params = BaseParams::empty();
        assert!(params.set_return_fields(&["name", " city ", ""]));
        assert_eq!(params.get("return-fields"), Some(&ParamValue::from("name,city")));

        assert!(params.set_threshold("price", Some(10), None));
        assert_eq!(params.get("t-price"), Some(&ParamValue::from("10..")));
        assert!(params.set_threshold("year", Some(1990), Some(2000)));
        assert_eq!(params.get("t-year"), Some(&ParamValue::from("1990..2000")));
    }
}
