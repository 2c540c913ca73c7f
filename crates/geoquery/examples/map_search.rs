//! Geo search against a CloudSearch domain
//!
//! This example builds the request for a map of San Francisco:
//! - A text query with a facet on the city field
//! - The map viewport as a boundary query
//! - Ranking blended between text relevance and distance from the map centre
//!
//! Set `CLOUDSEARCH_ENDPOINT` (the search endpoint host) or `CLOUDSEARCH_PROXY`
//! (a full url) to actually send the request; otherwise only the parameters
//! are printed.

use geoquery::{
    LatLon, SearchSession, SessionConfigBuilder, Viewport, init_logging,
    transport::{EndpointConfig, HttpTransport},
};
use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(Level::INFO)?;

    let config = SessionConfigBuilder::local_area().distance_weight(60).build();
    let mut session = SearchSession::new(config);
    session.set_param("q", "coffee");
    session.facet("city")?.set_limit(5).sort_by_count();
    session.set_viewport(Viewport::new(
        LatLon::new(37.70, -122.52),
        LatLon::new(37.81, -122.35),
    ));
    session.rank_by_distance();

    println!("Request parameters:");
    for (name, value) in &session.parameters() {
        println!("  {name} = {value}");
    }

    let endpoint = EndpointConfig {
        search_endpoint: std::env::var("CLOUDSEARCH_ENDPOINT").ok(),
        proxy_url: std::env::var("CLOUDSEARCH_PROXY").ok(),
        ..EndpointConfig::default()
    };
    let Ok(transport) = HttpTransport::new(&endpoint) else {
        println!("\nNo endpoint configured, not sending.");
        return Ok(());
    };

    let response = session.search(&transport).await?;
    println!("\nFound {} results:", response.hits.found);
    for doc in response.documents() {
        println!("  {} {}", doc.id, doc.get_string("name", None));
    }
    if let Some(cities) = response.facet("city") {
        for constraint in &cities.constraints {
            println!("  city {} ({})", constraint.value, constraint.count);
        }
    }
    Ok(())
}
