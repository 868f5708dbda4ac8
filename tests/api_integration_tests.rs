use atlas::api::{ApiError, CountryProvider, RestCountriesClient};
use atlas::core::resolver::{ResolutionUpdate, resolve_country};
use tokio::sync::mpsc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Helper Functions
// ============================================================================

/// Mounts the standard fixture set: FRA with two borders, plus DEU and ESP.
async fn mount_france_fixtures(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/alpha/FRA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "France",
            "capital": "Paris",
            "population": 67000000,
            "borders": ["DEU", "ESP"]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/alpha/DEU"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Germany",
            "capital": "Berlin",
            "population": 83000000,
            "borders": []
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/alpha/ESP"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Spain",
            "capital": "Madrid",
            "population": 47000000,
            "borders": ["FRA"]
        })))
        .mount(server)
        .await;
}

/// Runs one resolution against the given client and collects its updates.
async fn resolve(
    client: &RestCountriesClient,
    code: &str,
) -> (Result<(), ApiError>, Vec<ResolutionUpdate>) {
    let (tx, mut rx) = mpsc::channel(8);
    let result = resolve_country(client, code, tx).await;
    let mut updates = Vec::new();
    while let Some(update) = rx.recv().await {
        updates.push(update);
    }
    (result, updates)
}

// ============================================================================
// Directory Loader Tests
// ============================================================================

#[tokio::test]
async fn test_directory_fetch_requests_minimal_fields() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all"))
        .and(query_param("fields", "alpha3Code,name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"alpha3Code": "FRA", "name": "France"},
            {"alpha3Code": "DEU", "name": "Germany"}
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = RestCountriesClient::new(Some(mock_server.uri()));
    let directory = client.fetch_directory().await.unwrap();

    assert_eq!(directory.len(), 2);
    assert_eq!(directory[0].code, "FRA");
    assert_eq!(directory[0].name, "France");
    assert_eq!(directory[1].code, "DEU");
}

#[tokio::test]
async fn test_directory_fetch_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = RestCountriesClient::new(Some(mock_server.uri()));
    let result = client.fetch_directory().await;

    assert!(matches!(result, Err(ApiError::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_directory_fetch_malformed_json() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/all"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .mount(&mock_server)
        .await;

    let client = RestCountriesClient::new(Some(mock_server.uri()));
    let result = client.fetch_directory().await;

    assert!(matches!(result, Err(ApiError::Parse(_))));
}

// ============================================================================
// Detail Fetch Tests
// ============================================================================

#[tokio::test]
async fn test_detail_fetch_defaults_missing_fields() {
    let mock_server = MockServer::start().await;

    // Island territory: no capital, no borders in the response
    Mock::given(method("GET"))
        .and(path("/alpha/BVT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Bouvet Island",
            "population": 0
        })))
        .mount(&mock_server)
        .await;

    let client = RestCountriesClient::new(Some(mock_server.uri()));
    let record = client.fetch_country("BVT").await.unwrap();

    assert_eq!(record.name, "Bouvet Island");
    assert_eq!(record.capital, "");
    assert!(record.borders.is_empty());
}

#[tokio::test]
async fn test_detail_fetch_unknown_code() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alpha/XYZ"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Not Found"))
        .mount(&mock_server)
        .await;

    let client = RestCountriesClient::new(Some(mock_server.uri()));
    let result = client.fetch_country("XYZ").await;

    assert!(matches!(result, Err(ApiError::Api { status: 404, .. })));
}

// ============================================================================
// End-to-End Resolution Tests
// ============================================================================

#[tokio::test]
async fn test_resolution_end_to_end() {
    let mock_server = MockServer::start().await;
    mount_france_fixtures(&mock_server).await;

    let client = RestCountriesClient::new(Some(mock_server.uri()));
    let (result, updates) = resolve(&client, "FRA").await;

    assert!(result.is_ok());
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0], ResolutionUpdate::DetailFetched);

    let ResolutionUpdate::Resolved(view) = &updates[1] else {
        panic!("expected a Resolved update, got {:?}", updates[1]);
    };
    assert_eq!(view.name, "France");
    assert_eq!(view.capital, "Paris");
    assert_eq!(view.population, 67_000_000);
    // Border names, in the order the detail record listed the codes
    assert_eq!(view.border_names, vec!["Germany", "Spain"]);
}

#[tokio::test]
async fn test_resolution_border_name_count_matches_border_codes() {
    let mock_server = MockServer::start().await;
    mount_france_fixtures(&mock_server).await;

    let client = RestCountriesClient::new(Some(mock_server.uri()));
    let detail = client.fetch_country("FRA").await.unwrap();
    let (_, updates) = resolve(&client, "FRA").await;

    let ResolutionUpdate::Resolved(view) = &updates[1] else {
        panic!("expected a Resolved update");
    };
    assert_eq!(view.border_names.len(), detail.borders.len());
}

#[tokio::test]
async fn test_resolution_with_zero_borders() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alpha/ISL"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Iceland",
            "capital": "Reykjavik",
            "population": 364134,
            "borders": []
        })))
        .expect(1) // No border fan-out requests
        .mount(&mock_server)
        .await;

    let client = RestCountriesClient::new(Some(mock_server.uri()));
    let (result, updates) = resolve(&client, "ISL").await;

    assert!(result.is_ok());
    let ResolutionUpdate::Resolved(view) = &updates[1] else {
        panic!("expected a Resolved update");
    };
    assert!(view.border_names.is_empty());
}

#[tokio::test]
async fn test_resolution_fails_when_one_border_fetch_fails() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/alpha/FRA"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "France",
            "capital": "Paris",
            "population": 67000000,
            "borders": ["DEU", "ESP"]
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/alpha/DEU"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Germany",
            "capital": "Berlin",
            "population": 83000000,
            "borders": []
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/alpha/ESP"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .mount(&mock_server)
        .await;

    let client = RestCountriesClient::new(Some(mock_server.uri()));
    let (result, updates) = resolve(&client, "FRA").await;

    assert!(matches!(result, Err(ApiError::Api { status: 503, .. })));
    // The run got past the detail fetch but never produced a view model
    assert_eq!(updates, vec![ResolutionUpdate::DetailFetched]);
}

#[tokio::test]
async fn test_resolving_same_code_twice_is_idempotent() {
    let mock_server = MockServer::start().await;
    mount_france_fixtures(&mock_server).await;

    let client = RestCountriesClient::new(Some(mock_server.uri()));
    let (_, first) = resolve(&client, "FRA").await;
    let (_, second) = resolve(&client, "FRA").await;

    assert_eq!(first, second);
}
