use tracing::trace;

use super::{ParameterSet, grammar};
use crate::{expression::ExpressionRegistry, facet::FacetRegistry};

/// Merges base parameters with everything the registries contribute.
///
/// Merge order is base parameters, facets (with the composite `facet`
/// list), registered expressions, then extra rank expressions added with
/// [`ParameterAggregator::with_rank`]. A later entry wins on a name clash.
#[derive(Debug, Clone)]
pub struct ParameterAggregator<'a> {
    facets: &'a FacetRegistry,
    expressions: &'a ExpressionRegistry,
    extra_ranks: Vec<(String, String)>,
}

impl<'a> ParameterAggregator<'a> {
    pub fn new(facets: &'a FacetRegistry, expressions: &'a ExpressionRegistry) -> Self {
        Self {
            facets,
            expressions,
            extra_ranks: Vec::new(),
        }
    }

    /// Add a `rank-<name>` expression that is not held in the registry.
    pub fn with_rank(mut self, name: impl Into<String>, expression: impl Into<String>) -> Self {
        self.extra_ranks.push((name.into(), expression.into()));
        self
    }

    /// The `facet` list is only sent when at least one facet is registered,
    /// never as an empty value.
    pub fn build_parameters(&self, base: &ParameterSet) -> ParameterSet {
        let mut params = base.clone();

        if !self.facets.is_empty() {
            params.merge(self.facets.serialize());
            params.insert(grammar::FACET, self.facets.fields());
        }

        params.merge(self.expressions.serialize());

        for (name, expression) in &self.extra_ranks {
            params.insert(grammar::rank_key(name), expression.as_str());
        }

        trace!(count = params.len(), "Aggregated request parameters");
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{expression::ExpressionInput, params::ParamValue};

    fn registries() -> (FacetRegistry, ExpressionRegistry) {
        let mut facets = FacetRegistry::new();
        facets.create("state").unwrap().add_constraints("CA");
        facets.create("city").unwrap().set_limit(3);
        facets.create("genre").unwrap();

        let mut expressions = ExpressionRegistry::new();
        expressions
            .create(ExpressionInput::new("popular", "votes"))
            .unwrap();
        (facets, expressions)
    }

    #[test]
    fn test_build_parameters() {
        let (facets, expressions) = registries();
        let base: ParameterSet = [("q", "coffee")].into_iter().collect();

        let params = ParameterAggregator::new(&facets, &expressions).build_parameters(&base);

        assert_eq!(params.get_text("q").as_deref(), Some("coffee"));
        assert_eq!(params.get_text("facet").as_deref(), Some("state,city,genre"));
        assert_eq!(params.get_text("facet-state-constraints").as_deref(), Some("CA"));
        assert_eq!(params.get("facet-city-top-n"), Some(&ParamValue::Number(3)));
        assert_eq!(params.get_text("rank-popular").as_deref(), Some("votes"));
        assert_eq!(params.len(), 5);
        assert!(params.names().all(grammar::validate_name));
    }

    #[test]
    fn test_base_is_not_mutated() {
        let (facets, expressions) = registries();
        let base: ParameterSet = [("q", "coffee")].into_iter().collect();
        let _ = ParameterAggregator::new(&facets, &expressions).build_parameters(&base);
        assert_eq!(base.len(), 1);
    }

    #[test]
    fn test_deterministic() {
        let (facets, expressions) = registries();
        let base = ParameterSet::new();
        let aggregator = ParameterAggregator::new(&facets, &expressions).with_rank("geo", "distance");

        assert_eq!(aggregator.build_parameters(&base), aggregator.build_parameters(&base));
    }

    #[test]
    fn test_no_facets_no_facet_param() {
        let facets = FacetRegistry::new();
        let expressions = ExpressionRegistry::new();
        let params = ParameterAggregator::new(&facets, &expressions).build_parameters(&ParameterSet::new());
        assert!(params.is_empty());
    }

    #[test]
    fn test_registry_overrides_base_and_extra_rank_wins() {
        let (facets, expressions) = registries();
        let base: ParameterSet = [("facet", "old"), ("rank-geo", "old")].into_iter().collect();
        let params = ParameterAggregator::new(&facets, &expressions)
            .with_rank("geo", "new")
            .build_parameters(&base);
        assert_eq!(params.get_text("facet").as_deref(), Some("state,city,genre"));
        assert_eq!(params.get_text("rank-geo").as_deref(), Some("new"));
    }
}
