use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU8, Ordering},
};

use geoquery::{
    ExpressionInput, ExpressionSource, FacetDescriptor, GeoQueryError, LatLon, ParameterSet,
    SearchSession, SessionConfig, Transport, Viewport,
    transport::{SearchResponse, TransportError},
    validate_name,
};

const RESPONSE: &str = r#"{
    "rank": "-text_relevance",
    "match-expr": "(label 'coffee')",
    "hits": {
        "found": 1,
        "start": 0,
        "hit": [{"id": "sf-1", "data": {"name": ["Ritual"], "city": ["San Francisco"]}}]
    },
    "facets": {"city": {"constraints": [{"value": "San Francisco", "count": 1}]}}
}"#;

/// Records every parameter set it is asked to send.
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<ParameterSet>>,
}

impl RecordingTransport {
    fn requests(&self) -> Vec<ParameterSet> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    async fn search(&self, params: &ParameterSet) -> Result<SearchResponse, TransportError> {
        self.sent.lock().unwrap().push(params.clone());
        SearchResponse::from_json(RESPONSE)
    }
}

struct FailingTransport;

impl Transport for FailingTransport {
    async fn search(&self, _params: &ParameterSet) -> Result<SearchResponse, TransportError> {
        Err(TransportError::Status {
            status: 503,
            body: "unavailable".to_string(),
        })
    }
}

fn san_francisco() -> Viewport {
    Viewport::new(LatLon::new(37.70, -122.52), LatLon::new(37.81, -122.35))
}

#[test]
fn test_full_workflow_parameters() {
    let mut session = SearchSession::default();
    assert!(session.set_param("q", "coffee"));
    assert!(session.set_param("size", 20));
    assert!(!session.set_param("random", "x"));
    session
        .facet(FacetDescriptor::new("city").top_n(5).sort("count"))
        .unwrap();
    session.facet("state").unwrap().add_constraints("CA");
    session
        .expression(ExpressionInput::new("popular", "log10(reviews)"))
        .unwrap();
    session.set_viewport(san_francisco());

    let params = session.parameters();

    assert_eq!(params.get_text("q").as_deref(), Some("coffee"));
    assert_eq!(params.get_text("size").as_deref(), Some("20"));
    assert_eq!(params.get_text("facet").as_deref(), Some("city,state"));
    assert_eq!(params.get_text("facet-city-top-n").as_deref(), Some("5"));
    assert_eq!(params.get_text("facet-city-sort").as_deref(), Some("count"));
    assert_eq!(params.get_text("facet-state-constraints").as_deref(), Some("CA"));
    assert_eq!(params.get_text("rank-popular").as_deref(), Some("log10(reviews)"));
    assert_eq!(
        params.get_text("bq").as_deref(),
        Some("(and (and state:'CA') (and latitude_90:12770..12781 longitude_180:5748..5765))")
    );
    assert!(
        params
            .get_text("rank-geo")
            .is_some_and(|r| r.starts_with("sqrt((latitude_90-1277"))
    );
    assert!(params.names().all(validate_name));
}

#[test]
fn test_antimeridian_viewport() {
    let mut session = SearchSession::default();
    // Fiji to Samoa, across the 180th meridian
    session.set_viewport(Viewport::new(
        LatLon::new(-20.0, 170.0),
        LatLon::new(-10.0, -170.0),
    ));

    let bounds = session.map().and_then(|m| m.bounds()).copied().unwrap();
    assert!(bounds.crosses_antimeridian());
    assert_eq!(
        session.boundary_query().as_deref(),
        Some(
            "(or (and latitude_90:7000..8000 longitude_180:..1000) \
             (and latitude_90:7000..8000 longitude_180:35000..))"
        )
    );

    let center = session.map().and_then(|m| m.center_degrees()).unwrap();
    assert!((center.lat + 15.0).abs() < 1e-9);
    assert!((center.lon.abs() - 180.0).abs() < 1e-9);
}

#[test]
fn test_parameters_are_deterministic() {
    let mut session = SearchSession::default();
    session.set_param("q", "tacos");
    session.facet("city").unwrap().add_constraints(["Oakland", "Berkeley"]);
    session.set_viewport(san_francisco());

    assert_eq!(session.parameters(), session.parameters());
}

#[test]
fn test_producer_expression_follows_state() {
    let boost = Arc::new(AtomicU8::new(1));
    let source = Arc::clone(&boost);

    let mut session = SearchSession::default();
    session
        .expression(ExpressionInput::new(
            "boosted",
            ExpressionSource::producer(move || format!("{} * text_relevance", source.load(Ordering::SeqCst))),
        ))
        .unwrap();

    assert_eq!(
        session.parameters().get_text("rank-boosted").as_deref(),
        Some("1 * text_relevance")
    );
    boost.store(3, Ordering::SeqCst);
    assert_eq!(
        session.parameters().get_text("rank-boosted").as_deref(),
        Some("3 * text_relevance")
    );
}

#[tokio::test]
async fn test_search_dispatches_parameters() {
    let transport = RecordingTransport::default();
    let mut session = SearchSession::default();
    session.set_param("q", "coffee");
    session.facet("city").unwrap();

    let response = session.search(&transport).await.unwrap();

    assert_eq!(response.hits.found, 1);
    assert_eq!(response.documents()[0].first("name"), Some("Ritual"));
    assert_eq!(response.facet("city").unwrap().constraints[0].count, 1);

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0], session.parameters());
}

#[tokio::test]
async fn test_search_match_everything_fallback() {
    let transport = RecordingTransport::default();
    let session = SearchSession::default();

    session.search(&transport).await.unwrap();

    let requests = transport.requests();
    assert_eq!(requests[0].get_text("q").as_deref(), Some("-matcheseverything"));
}

#[tokio::test]
async fn test_search_empty_query_fails_before_request() {
    let transport = RecordingTransport::default();
    let session = SearchSession::new(SessionConfig::builder().match_everything(false).build());

    let result = session.search(&transport).await;

    assert!(matches!(result, Err(GeoQueryError::EmptyQuery)));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn test_search_with_only_bq_is_allowed() {
    let transport = RecordingTransport::default();
    let mut session = SearchSession::new(SessionConfig::builder().match_everything(false).build());
    session.set_viewport(san_francisco());

    session.search(&transport).await.unwrap();

    let requests = transport.requests();
    assert!(!requests[0].contains("q"));
    assert!(requests[0].contains("bq"));
}

#[tokio::test]
async fn test_transport_failure_passes_through() {
    let mut session = SearchSession::default();
    session.set_param("q", "coffee");

    let result = session.search(&FailingTransport).await;

    assert!(matches!(
        result,
        Err(GeoQueryError::Transport(TransportError::Status { status: 503, .. }))
    ));
}
