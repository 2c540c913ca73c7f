use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoQueryError {
    #[error("Facet error: {0}")]
    Facet(#[from] crate::facet::FacetError),
    #[error("Expression error: {0}")]
    Expression(#[from] crate::expression::ExpressionError),
    #[error("Query has no `q` or `bq` and match-everything is disabled")]
    EmptyQuery,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Transport error: {0}")]
    Transport(#[from] geoquery_transport::TransportError),
    #[error("Init Logging error: {0}")]
    InitLoggingError(#[from] tracing_subscriber::filter::ParseError),
}

pub type Result<T> = std::result::Result<T, GeoQueryError>;
