//! geoquery - Geo-aware query building for Amazon CloudSearch
//!
//! geoquery turns the state of a search UI (free text, facet selections,
//! named rank expressions and the viewport of a map) into the flat request
//! parameters of the CloudSearch 2011-02-01 search API. Coordinates are
//! indexed as offset-encoded unsigned integers, so the current map viewport
//! becomes a boundary query (`bq`) over two integer fields and the map centre
//! feeds a rank expression blending text relevance with distance.
//!
//! # Quick Start
//!
//! ```rust
//! use geoquery::{LatLon, SearchSession, SessionConfig, Viewport};
//!
//! let mut session = SearchSession::new(SessionConfig::default());
//! session.set_param("q", "coffee");
//! session.facet("city")?.set_limit(5);
//! session.set_viewport(Viewport::new(
//!     LatLon::new(37.70, -122.52),
//!     LatLon::new(37.81, -122.35),
//! ));
//!
//! let params = session.parameters();
//! assert_eq!(params.get_text("facet").as_deref(), Some("city"));
//! assert!(params.contains("bq"));
//! assert!(params.contains("rank-geo"));
//! # Ok::<(), geoquery::error::GeoQueryError>(())
//! ```
//!
//! Sending the request needs a [`Transport`]; [`transport::HttpTransport`]
//! talks to a CloudSearch search endpoint or a proxy in front of it.
//!
//! # Antimeridian
//!
//! A viewport whose west edge is east of its east edge crosses the 180th
//! meridian. Its boundary query is the OR of two boxes, one on each side.
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod config;
mod core;
pub mod error;
pub mod expression;
pub mod facet;
pub mod geo;
pub mod params;

pub use core::{MATCH_EVERYTHING_QUERY, SearchSession, Transport};

pub use config::{
    DEFAULT_GEO_EXPRESSION, DEFAULT_LAT_FIELD, DEFAULT_LON_FIELD, SessionConfig,
    SessionConfigBuilder,
};
pub use error::{GeoQueryError, Result};
pub use expression::{Expression, ExpressionInput, ExpressionRegistry, ExpressionSource};
pub use facet::{ConstraintValues, Facet, FacetDescriptor, FacetInput, FacetRegistry, SortMode};
pub use geo::{
    BoundaryQueryBuilder, BoundingBox, CoordinateEncoder, CoordinateOffset, EncodedPoint,
    EncodedRange, LatLon, MapView, RankExpressionComposer, Viewport,
};
pub use geoquery_transport as transport;
pub use params::{BaseParams, ParamValue, ParameterAggregator, ParameterSet, validate_name};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for geoquery.
///
/// Installs a `tracing` fmt subscriber. `RUST_LOG` wins when set, otherwise
/// `level` is used. HTTP client internals are capped at `warn`. Later calls
/// are no-ops.
///
/// # Examples
///
/// ```rust
/// use geoquery::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), geoquery::error::GeoQueryError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static ()> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("reqwest=warn".parse()?)
            .add_directive("hyper_util=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .init();
        Ok(())
    })
}
