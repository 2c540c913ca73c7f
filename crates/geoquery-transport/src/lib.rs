//! Transport layer for geoquery.
//!
//! Resolves where search requests go (a CloudSearch search endpoint or a
//! proxy), turns a finished parameter list into a request url, sends it and
//! parses the response payload.

mod endpoint;
mod error;
mod http;
mod response;

pub use endpoint::{DEFAULT_API_VERSION, Endpoint, EndpointConfig};
pub use error::{Result, TransportError};
pub use http::HttpTransport;
pub use response::{
    DEFAULT_FIELD_DELIMITER, Document, FacetConstraint, FacetResult, Hits, ResponseInfo,
    SearchResponse,
};
