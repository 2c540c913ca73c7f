use crate::{
    error::GeoQueryError,
    geo::{CoordinateOffset, MAX_DISTANCE_WEIGHT},
    params::{DEFAULT_PAGE_SIZE, DEFAULT_RANK},
};

pub const DEFAULT_LAT_FIELD: &str = "latitude_90";
pub const DEFAULT_LON_FIELD: &str = "longitude_180";
pub const DEFAULT_GEO_EXPRESSION: &str = "geo";

/// Settings for a [`crate::SearchSession`].
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    /// Index field holding the encoded latitude.
    pub lat_field: String,
    /// Index field holding the encoded longitude.
    pub lon_field: String,
    pub encoding: CoordinateOffset,
    /// 0 ranks by text relevance only, 100 by distance only.
    pub distance_weight: u8,
    /// Name of the rank expression carrying the geo ranking (`rank-<name>`).
    pub geo_expression_name: String,
    pub page_size: u32,
    pub default_rank: String,
    /// Send `q=-matcheseverything` when there is neither `q` nor `bq`.
    pub match_everything: bool,
    /// Add facet constraints to `bq` as filters.
    pub filter_by_facet_constraints: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            lat_field: DEFAULT_LAT_FIELD.to_string(),
            lon_field: DEFAULT_LON_FIELD.to_string(),
            encoding: CoordinateOffset::default(),
            distance_weight: MAX_DISTANCE_WEIGHT,
            geo_expression_name: DEFAULT_GEO_EXPRESSION.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            default_rank: DEFAULT_RANK.to_string(),
            match_everything: true,
            filter_by_facet_constraints: true,
        }
    }
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::new()
    }
}

/// Builder for creating session configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct SessionConfigBuilder {
    config: SessionConfig,
}

impl SessionConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: SessionConfig::default(),
        }
    }

    /// Country or continent sized maps, where proximity matters less than text
    pub fn wide_area() -> Self {
        let mut builder = Self::new();
        builder.config.distance_weight = 25;
        builder.config.page_size = 50;
        builder
    }

    /// City sized maps, ranked purely by distance from the map centre
    pub fn local_area() -> Self {
        let mut builder = Self::new();
        builder.config.distance_weight = MAX_DISTANCE_WEIGHT;
        builder.config.page_size = 20;
        builder
    }

    /// Set the index fields holding the encoded coordinates
    pub fn geo_fields(mut self, lat_field: impl Into<String>, lon_field: impl Into<String>) -> Self {
        self.config.lat_field = lat_field.into();
        self.config.lon_field = lon_field.into();
        self
    }

    /// Set the offsets added to latitude and longitude before scaling
    pub fn offsets(mut self, latitude: f64, longitude: f64) -> Self {
        self.config.encoding.latitude_offset = latitude;
        self.config.encoding.longitude_offset = longitude;
        self
    }

    /// Set the distance weight (clamped to 0..=100)
    pub fn distance_weight(mut self, weight: u8) -> Self {
        self.config.distance_weight = weight.min(MAX_DISTANCE_WEIGHT);
        self
    }

    pub fn geo_expression_name(mut self, name: impl Into<String>) -> Self {
        self.config.geo_expression_name = name.into();
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn default_rank(mut self, rank: impl Into<String>) -> Self {
        self.config.default_rank = rank.into();
        self
    }

    pub fn match_everything(mut self, enabled: bool) -> Self {
        self.config.match_everything = enabled;
        self
    }

    pub fn filter_by_facet_constraints(mut self, enabled: bool) -> Self {
        self.config.filter_by_facet_constraints = enabled;
        self
    }

    /// Set the full coordinate encoding. The scale must be finite and positive.
    pub fn custom_encoding(
        mut self,
        latitude_offset: f64,
        longitude_offset: f64,
        scale: f64,
    ) -> Result<Self, GeoQueryError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(GeoQueryError::ConfigError(format!(
                "Encoding scale must be a positive number, got {scale}"
            )));
        }
        if !latitude_offset.is_finite() || !longitude_offset.is_finite() {
            return Err(GeoQueryError::ConfigError(
                "Encoding offsets must be finite".to_string(),
            ));
        }
        self.config.encoding = CoordinateOffset {
            latitude_offset,
            longitude_offset,
            scale,
        };
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> SessionConfig {
        self.config
    }
}
