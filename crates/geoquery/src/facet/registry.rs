use itertools::Itertools;
use tracing::debug;

use super::{Facet, FacetError, FacetInput};
use crate::params::ParameterSet;

/// One facet per field, in registration order.
#[derive(Debug, Clone, Default)]
pub struct FacetRegistry {
    facets: Vec<Facet>,
}

impl FacetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the facet for the input's field, creating it on first use.
    ///
    /// When the field is already registered the existing facet is returned
    /// untouched, even if the input is a descriptor. A blank field name is an
    /// [`FacetError::InvalidFacetDescriptor`].
    pub fn create(&mut self, input: impl Into<FacetInput>) -> Result<&mut Facet, FacetError> {
        let input = input.into();
        let field = input.field().trim();
        if field.is_empty() {
            return Err(FacetError::InvalidFacetDescriptor(
                "facet field name must not be empty".to_string(),
            ));
        }

        if let Some(pos) = self.position(field) {
            return Ok(&mut self.facets[pos]);
        }

        debug!(field, "Registering facet");
        self.facets.push(Facet::from_input(input));
        let last = self.facets.len() - 1;
        Ok(&mut self.facets[last])
    }

    pub fn get(&self, field: &str) -> Option<&Facet> {
        self.position(field).map(|pos| &self.facets[pos])
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut Facet> {
        self.position(field).map(move |pos| &mut self.facets[pos])
    }

    /// Returns the removed facet, if the field was registered.
    pub fn remove(&mut self, field: &str) -> Option<Facet> {
        self.position(field).map(|pos| self.facets.remove(pos))
    }

    pub fn remove_all(&mut self) {
        self.facets.clear();
    }

    pub fn all(&self) -> &[Facet] {
        &self.facets
    }

    pub fn len(&self) -> usize {
        self.facets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Comma-joined list of every registered field, for the `facet` parameter.
    pub fn fields(&self) -> String {
        self.facets.iter().map(Facet::field).join(",")
    }

    /// Every facet's own parameters merged together.
    pub fn serialize(&self) -> ParameterSet {
        let mut params = ParameterSet::new();
        for facet in &self.facets {
            params.merge(facet.serialize());
        }
        params
    }

    /// Filter queries of every facet that has constraints.
    pub fn filter_queries(&self) -> Vec<String> {
        self.facets.iter().filter_map(Facet::filter_query).collect()
    }

    fn position(&self, field: &str) -> Option<usize> {
        let field = field.trim();
        self.facets.iter().position(|f| f.field() == field)
    }
}
