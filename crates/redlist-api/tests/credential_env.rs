//! Credential resolution against the live environment
//!
//! Kept in its own test binary with a single test: it sets
//! `IUCN_REDLIST_KEY`, which every other test expects to be untouched.

use redlist_api::{credential, options, ClientConfig, RedListClient, KEY_ENV_VAR};
use serde_json::json;
use wiremock::{
    matchers::{header, method},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn test_environment_key_priority() {
    let dir = tempfile::tempdir().expect("tempdir");
    let options_path = dir.path().join("options.json");
    options::store_key(&options_path, "stored-key").expect("store");

    std::env::set_var(KEY_ENV_VAR, "env-key");

    // Environment beats the options file; an explicit key beats both.
    let cred = credential::resolve(None, Some(&options_path)).expect("resolve");
    assert_eq!(cred.as_str(), "env-key");
    let cred = credential::resolve(Some("arg-key"), Some(&options_path)).expect("resolve");
    assert_eq!(cred.as_str(), "arg-key");

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("Authorization", "env-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"api_version": "v4"})))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new()
        .with_base_url(format!("{}/api/v4", server.uri()))
        .with_options_path(Some(options_path.clone()));
    let client = RedListClient::with_config(config).expect("client");
    assert_eq!(client.api_version().await.expect("version"), "v4");

    // A blank environment value falls through to the options file.
    std::env::set_var(KEY_ENV_VAR, "   ");
    let cred = credential::resolve(None, Some(&options_path)).expect("resolve");
    assert_eq!(cred.as_str(), "stored-key");

    std::env::remove_var(KEY_ENV_VAR);
}
