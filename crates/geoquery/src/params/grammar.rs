//! Names the search backend accepts as request parameters.

use once_cell::sync::Lazy;
use regex::Regex;

pub const QUERY: &str = "q";
pub const BOUNDARY_QUERY: &str = "bq";
pub const SIZE: &str = "size";
pub const START: &str = "start";
pub const RANK: &str = "rank";
pub const RESULTS_TYPE: &str = "results-type";
pub const RETURN_FIELDS: &str = "return-fields";
pub const FACET: &str = "facet";

static PARAM_NAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(bq|q|size|start|facet|facet-.+-constraints|facet-.+-top-n|facet-.+-sort|rank|rank-.+|results-type|return-fields|t-.+)$",
    )
    .expect("parameter name grammar is valid")
});

/// Check a candidate parameter name against the request grammar.
///
/// Names are matched as given; callers normalise case and whitespace first.
pub fn validate_name(name: &str) -> bool {
    PARAM_NAME.is_match(name)
}

pub fn facet_constraints_key(field: &str) -> String {
    format!("facet-{field}-constraints")
}

pub fn facet_top_n_key(field: &str) -> String {
    format!("facet-{field}-top-n")
}

pub fn facet_sort_key(field: &str) -> String {
    format!("facet-{field}-sort")
}

pub fn rank_key(name: &str) -> String {
    format!("rank-{name}")
}

pub fn threshold_key(name: &str) -> String {
    format!("t-{name}")
}
