use std::{collections::BTreeMap, future::Future};

use geoquery_transport::{HttpTransport, SearchResponse, TransportError};
use itertools::Itertools;
use tracing::{debug, info, instrument};

use crate::{
    config::SessionConfig,
    error::{GeoQueryError, Result},
    expression::{Expression, ExpressionInput, ExpressionRegistry},
    facet::{Facet, FacetInput, FacetRegistry},
    geo::{CoordinateEncoder, MAX_DISTANCE_WEIGHT, MapView, Viewport},
    params::{BaseParams, ParamValue, ParameterAggregator, ParameterSet, grammar},
};

/// `q` sent when a search has neither a text query nor a boundary query.
pub const MATCH_EVERYTHING_QUERY: &str = "-matcheseverything";

/// Something that can run a search for a finished parameter set.
pub trait Transport {
    fn search(
        &self,
        params: &ParameterSet,
    ) -> impl Future<Output = std::result::Result<SearchResponse, TransportError>> + Send;
}

impl Transport for HttpTransport {
    async fn search(&self, params: &ParameterSet) -> std::result::Result<SearchResponse, TransportError> {
        self.send(params.to_query_pairs()).await
    }
}

/// State of one logical search: registries, explicit parameters, filters and
/// the map the results are shown on.
#[derive(Debug, Clone)]
pub struct SearchSession {
    config: SessionConfig,
    facets: FacetRegistry,
    expressions: ExpressionRegistry,
    base: BaseParams,
    map: Option<MapView>,
    filters: BTreeMap<String, String>,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SearchSession {
    pub fn new(config: SessionConfig) -> Self {
        let base = BaseParams::with_defaults(config.page_size, &config.default_rank);
        Self {
            config,
            facets: FacetRegistry::new(),
            expressions: ExpressionRegistry::new(),
            base,
            map: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get or create the facet for a field.
    pub fn facet(&mut self, input: impl Into<FacetInput>) -> Result<&mut Facet> {
        Ok(self.facets.create(input)?)
    }

    pub fn facets(&self) -> &FacetRegistry {
        &self.facets
    }

    pub fn facets_mut(&mut self) -> &mut FacetRegistry {
        &mut self.facets
    }

    /// Get or create a named rank expression.
    pub fn expression(&mut self, input: impl Into<ExpressionInput>) -> Result<&mut Expression> {
        Ok(self.expressions.create(input)?)
    }

    pub fn expressions(&self) -> &ExpressionRegistry {
        &self.expressions
    }

    pub fn expressions_mut(&mut self) -> &mut ExpressionRegistry {
        &mut self.expressions
    }

    /// See [`BaseParams::set`]. Returns `false` when the name or value is refused.
    pub fn set_param(&mut self, name: &str, value: impl Into<ParamValue>) -> bool {
        self.base.set(name, value)
    }

    pub fn get_param(&self, name: &str) -> Option<&ParamValue> {
        self.base.get(name)
    }

    pub fn remove_param(&mut self, name: &str) -> bool {
        self.base.remove(name)
    }

    pub fn params_mut(&mut self) -> &mut BaseParams {
        &mut self.base
    }

    /// Attach a map using the configured fields and encoding, if there is
    /// none yet.
    pub fn map_mut(&mut self) -> &mut MapView {
        let config = &self.config;
        self.map.get_or_insert_with(|| {
            MapView::new(
                CoordinateEncoder::new(config.encoding),
                config.lat_field.clone(),
                config.lon_field.clone(),
                config.distance_weight,
            )
        })
    }

    pub fn map(&self) -> Option<&MapView> {
        self.map.as_ref()
    }

    pub fn detach_map(&mut self) -> Option<MapView> {
        self.map.take()
    }

    /// Map viewport change. Attaches a map on first use.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.map_mut().set_viewport(viewport);
    }

    /// Returns the weight actually stored (clamped to 100).
    ///
    /// Without a map the weight is kept for the map attached by the next
    /// viewport; no geo rank expression is sent until then.
    pub fn set_distance_weight(&mut self, weight: u8) -> u8 {
        let weight = match self.map.as_mut() {
            Some(map) => map.set_distance_weight(weight),
            None => weight.min(MAX_DISTANCE_WEIGHT),
        };
        self.config.distance_weight = weight;
        weight
    }

    /// Rank results by the geo expression instead of the configured default.
    pub fn rank_by_distance(&mut self) -> bool {
        let name = self.config.geo_expression_name.clone();
        self.base.set(grammar::RANK, name)
    }

    /// Add or replace a named boolean filter. An empty query is refused.
    pub fn set_filter(&mut self, name: impl Into<String>, bq: impl Into<String>) -> bool {
        let bq = bq.into().trim().to_string();
        if bq.is_empty() {
            return false;
        }
        let name = name.into();
        debug!(name = %name, bq = %bq, "Filter set");
        self.filters.insert(name, bq);
        true
    }

    pub fn remove_filter(&mut self, name: &str) -> bool {
        self.filters.remove(name).is_some()
    }

    pub fn filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The combined `bq`: explicit `bq` parameter, named filters, facet
    /// constraint filters and the map boundary, in that order.
    pub fn boundary_query(&self) -> Option<String> {
        let mut clauses: Vec<String> = Vec::new();

        if let Some(bq) = self.base.get(grammar::BOUNDARY_QUERY) {
            let bq = bq.as_text();
            if !bq.is_empty() {
                clauses.push(bq.into_owned());
            }
        }
        clauses.extend(self.filters.values().cloned());
        if self.config.filter_by_facet_constraints {
            clauses.extend(self.facets.filter_queries());
        }
        if let Some(boundary) = self.map.as_ref().and_then(MapView::boundary_query) {
            clauses.push(boundary);
        }

        match clauses.len() {
            0 => None,
            1 => clauses.pop(),
            _ => Some(format!("(and {})", clauses.iter().join(" "))),
        }
    }

    /// Every parameter of the next request.
    pub fn parameters(&self) -> ParameterSet {
        let mut base = self.base.all().clone();
        base.remove(grammar::BOUNDARY_QUERY);

        let bq = self.boundary_query();
        let has_bq = bq.is_some();
        if let Some(bq) = bq {
            base.insert(grammar::BOUNDARY_QUERY, bq);
        }

        if !self.has_query() {
            base.remove(grammar::QUERY);
            if !has_bq && self.config.match_everything {
                base.insert(grammar::QUERY, MATCH_EVERYTHING_QUERY);
            }
        }

        let mut aggregator = ParameterAggregator::new(&self.facets, &self.expressions);
        if let Some(map) = &self.map {
            aggregator = aggregator.with_rank(&self.config.geo_expression_name, map.rank_expression());
        }
        aggregator.build_parameters(&base)
    }

    /// Build the parameters and run them through the transport.
    #[instrument(name = "Search", level = "info", skip_all)]
    pub async fn search<T: Transport>(&self, transport: &T) -> Result<SearchResponse> {
        if !self.has_query() && self.boundary_query().is_none() && !self.config.match_everything {
            return Err(GeoQueryError::EmptyQuery);
        }

        let params = self.parameters();
        info!(
            params = params.len(),
            facets = self.facets.len(),
            "Dispatching search"
        );
        let response = transport.search(&params).await?;
        info!(
            found = response.hits.found,
            returned = response.hits.hit.len(),
            "Search complete"
        );
        Ok(response)
    }

    fn has_query(&self) -> bool {
        self.base
            .get(grammar::QUERY)
            .is_some_and(|q| !q.as_text().trim().is_empty())
    }
}
