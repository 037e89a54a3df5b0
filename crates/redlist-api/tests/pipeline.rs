//! End-to-end tests of the request pipeline against a wiremock server.

use redlist_api::{
    AssessmentQuery, ClientConfig, PageSelection, Parsed, Query, RedListClient, RedListError,
    KEY_ENV_VAR,
};
use serde_json::{json, Value};
use wiremock::{
    matchers::{header, method, path, query_param, query_param_is_missing},
    Mock, MockServer, ResponseTemplate,
};

const KEY: &str = "test-key";

fn client_for(server: &MockServer) -> RedListClient {
    let config = ClientConfig::new()
        .with_base_url(format!("{}/api/v4", server.uri()))
        .with_key(KEY)
        .with_options_path(None);
    RedListClient::with_config(config).expect("client")
}

async fn mount_page(server: &MockServer, endpoint: &str, page: u32, body: Value) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("page", page.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_single_page_result_is_page_one_verbatim() {
    let server = MockServer::start().await;
    mount_page(&server, "/api/v4/species/id/12392", 1, json!({"assessments": [{"id": 1}]})).await;
    mount_page(&server, "/api/v4/species/id/12392", 2, json!({"assessments": []})).await;

    let client = client_for(&server);
    let result = client
        .fetch_paged("species/id/12392", &Query::new(), PageSelection::All, true, false)
        .await
        .expect("fetch");

    assert_eq!(result, Parsed::Nested(json!({"assessments": [{"id": 1}]})));
}

#[tokio::test]
async fn test_three_pages_combine_with_first_page_metadata() {
    let server = MockServer::start().await;
    let endpoint = "/api/v4/taxa/family/Felidae";
    mount_page(
        &server,
        endpoint,
        1,
        json!({"family": "Felidae", "page_marker": 1, "assessments": [{"assessment_id": 10}]}),
    )
    .await;
    mount_page(
        &server,
        endpoint,
        2,
        json!({"family": "Felidae", "page_marker": 2, "assessments": [{"assessment_id": 11}]}),
    )
    .await;
    mount_page(&server, endpoint, 3, json!({"assessments": []})).await;

    let client = client_for(&server);
    let q = AssessmentQuery::new().with_quiet(true).with_flatten(false);
    let result = client.family("Felidae", &q).await.expect("family");

    assert_eq!(
        result,
        Parsed::Nested(json!({
            "family": "Felidae",
            "page_marker": 1,
            "assessments": [{"assessment_id": 10}, {"assessment_id": 11}]
        }))
    );
}

#[tokio::test]
async fn test_empty_first_page_is_returned_as_is() {
    let server = MockServer::start().await;
    let body = json!({"assessments": [], "filters": {"year_published": 1999}});
    Mock::given(method("GET"))
        .and(path("/api/v4/habitats/1_1"))
        .and(query_param("page", "1"))
        .and(query_param("year_published", "1999"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body.clone()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let q = AssessmentQuery::new()
        .with_year_published(1999)
        .with_quiet(true)
        .with_flatten(false);
    let result = client.habitats(Some("1.1"), &q).await.expect("habitats");

    assert_eq!(result, Parsed::Nested(body));
}

#[tokio::test]
async fn test_flattened_pages_stack_into_one_table() {
    let server = MockServer::start().await;
    let endpoint = "/api/v4/threats/2_1";
    mount_page(&server, endpoint, 1, json!({"assessments": [{"id": 1, "taxon": {"name": "a"}}]})).await;
    mount_page(&server, endpoint, 2, json!({"assessments": [{"id": 2, "taxon": {"name": "b"}}]})).await;
    mount_page(&server, endpoint, 3, json!({"assessments": []})).await;

    let client = client_for(&server);
    let result = client
        .threats(Some("2.1"), &AssessmentQuery::new().with_quiet(true))
        .await
        .expect("threats");

    assert!(result.is_flat());
    assert_eq!(
        result.to_json(),
        json!({"assessments": {"columns": ["id", "taxon.name"], "rows": [[1, "a"], [2, "b"]]}})
    );
}

#[tokio::test]
async fn test_sends_authorization_and_user_agent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/information/api_version"))
        .and(header("Authorization", KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"api_version": "v4"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    assert_eq!(client.api_version().await.expect("version"), "v4");

    let requests = server.received_requests().await.expect("recording enabled");
    let ua = requests[0]
        .headers
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(ua.starts_with("redlist-api/"));
}

#[tokio::test]
async fn test_species_query_omits_unset_params() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/taxa/scientific_name"))
        .and(query_param("genus_name", "Panthera"))
        .and(query_param("species_name", "leo"))
        .and(query_param_is_missing("infra_name"))
        .and(query_param_is_missing("subpopulation_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "taxon": {"sis_id": 15951},
            "assessments": [{"assessment_id": 1, "latest": true}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .species("Panthera", "leo", None, None, false)
        .await
        .expect("species");
    assert_eq!(result.record_count("assessments"), 1);
}

#[tokio::test]
async fn test_species_latest_follows_latest_assessment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v4/taxa/scientific_name"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "assessments": [
                {"assessment_id": 5, "latest": false},
                {"assessment_id": 9, "latest": true}
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v4/assessment/9"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"assessment_id": 9})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let result = client
        .species_latest("Panthera", "leo", None, None, false)
        .await
        .expect("latest");
    assert_eq!(result, Parsed::Nested(json!({"assessment_id": 9})));
}

#[tokio::test]
async fn test_unauthorized_regardless_of_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"assessments": [{"id": 1}]})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.assessment(1, false).await.unwrap_err();
    assert!(matches!(err, RedListError::Unauthorized));
    assert_eq!(err.to_string(), "Token not valid!");
}

#[tokio::test]
async fn test_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("whatever"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.sis(99999999, false).await.unwrap_err();
    assert!(matches!(err, RedListError::NotFound));
}

#[tokio::test]
async fn test_embedded_message_in_ok_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "x"})))
        .mount(&server)
        .await;

    let client = client_for(&server);
    match client.assessment(1, true).await.unwrap_err() {
        RedListError::Api(msg) => assert_eq!(msg, "x"),
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_on_later_page_aborts_whole_query() {
    let server = MockServer::start().await;
    let endpoint = "/api/v4/countries/KE";
    mount_page(&server, endpoint, 1, json!({"assessments": [{"id": 1}]})).await;
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .countries(Some("KE"), &AssessmentQuery::new().with_quiet(true))
        .await
        .unwrap_err();
    assert!(matches!(err, RedListError::Http { status: 503 }));
}

#[tokio::test]
async fn test_single_page_selection_requests_only_that_page() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/api/v4/taxa/possibly_extinct",
        3,
        json!({"assessments": [{"id": 7}]}),
    )
    .await;

    let client = client_for(&server);
    let q = AssessmentQuery::new().with_page(3).with_flatten(false);
    let result = client.possibly_extinct(&q).await.expect("extinct");
    assert_eq!(result.record_count("assessments"), 1);
}

#[tokio::test]
async fn test_whitespace_in_path_is_encoded() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/api/v4/comprehensive_groups/reef%20building%20corals",
        1,
        json!({"assessments": []}),
    )
    .await;

    let client = client_for(&server);
    let q = AssessmentQuery::new().with_quiet(true);
    client
        .comprehensive_groups(Some("reef building corals"), &q)
        .await
        .expect("groups");
}

#[tokio::test]
async fn test_validation_happens_before_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client.species(" ", "leo", None, None, true).await.unwrap_err();
    assert!(matches!(err, RedListError::Validation(_)));
    let err = client.assessment_list(&[], false).await.unwrap_err();
    assert!(matches!(err, RedListError::Validation(_)));
}

#[tokio::test]
async fn test_assessment_list_fetches_in_order() {
    let server = MockServer::start().await;
    for id in [3u64, 1] {
        Mock::given(method("GET"))
            .and(path(format!("/api/v4/assessment/{}", id)))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"assessment_id": id, "taxon": {"sis_id": id * 100}})),
            )
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = client_for(&server);
    let list = client.assessment_list(&[3, 1], false).await.expect("list");
    let sis = redlist_api::extract(&list, "taxon__sis_id").expect("extract");
    assert_eq!(sis, vec![json!(300), json!(100)]);
}

#[tokio::test]
async fn test_key_from_options_file() {
    if std::env::var(KEY_ENV_VAR).map(|v| !v.trim().is_empty()).unwrap_or(false) {
        // Environment key would take priority over the options file.
        return;
    }

    let dir = tempfile::tempdir().expect("tempdir");
    let options_path = dir.path().join("options.json");
    redlist_api::options::store_key(&options_path, "stored-key").expect("store");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Authorization", "stored-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"red_list_version": "2025-1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(format!("{}/api/v4", server.uri()))
        .with_options_path(Some(options_path));
    let client = RedListClient::with_config(config).expect("client");

    assert_eq!(
        client.citation().await.expect("citation"),
        "IUCN 2025. IUCN Red List of Threatened Species. Version 2025-1 <www.iucnredlist.org>"
    );
}

#[tokio::test]
async fn test_missing_credential() {
    if std::env::var(KEY_ENV_VAR).map(|v| !v.trim().is_empty()).unwrap_or(false) {
        return;
    }

    let config = ClientConfig::new()
        .with_base_url("http://127.0.0.1:9/api/v4")
        .with_options_path(None);
    let client = RedListClient::with_config(config).expect("client");
    let err = client.red_list_version().await.unwrap_err();
    assert!(matches!(err, RedListError::MissingCredential));
}
