// Copyright (c) 2025 - Cowboy AI, Inc.
//! HTTP Client Integration Tests
//!
//! Runs the reqwest-backed clients against wiremock servers speaking the
//! AAS Part 2 REST conventions.

#![cfg(feature = "http")]

use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mnestix_aas_search::clients::{ClientFactory, HttpClientConfig, HttpClientFactory};
use mnestix_aas_search::domain::{encode_id, InfrastructureConnection, SecurityConfig};
use mnestix_aas_search::errors::ApiErrorCode;
use mnestix_aas_search::search::{AasSearcher, StaticInfrastructureStore};

const AAS_ID: &str = "https://example.com/ids/aas/7600_5912_3951_6917";
const ASSET_ID: &str = "https://example.com/ids/asset/1";
const SUBMODEL_ID: &str = "https://example.com/ids/sm/nameplate";

fn factory() -> HttpClientFactory {
    HttpClientFactory::new(HttpClientConfig { timeout_secs: 5 }).unwrap()
}

fn shell_json(id: &str) -> serde_json::Value {
    json!({
        "modelType": "AssetAdministrationShell",
        "id": id,
        "idShort": "Pump",
        "assetInformation": {
            "assetKind": "Instance",
            "globalAssetId": ASSET_ID
        },
        "submodels": [
            { "type": "ModelReference", "keys": [{ "type": "Submodel", "value": SUBMODEL_ID }] }
        ]
    })
}

#[tokio::test]
async fn test_repository_fetches_shell_by_encoded_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/shells/{}", encode_id(AAS_ID))))
        .respond_with(ResponseTemplate::new(200).set_body_json(shell_json(AAS_ID)))
        .expect(1)
        .mount(&server)
        .await;

    let client = factory()
        .aas_repository_client(&server.uri(), &SecurityConfig::None)
        .unwrap();
    let shell = client.get_shell_by_id(AAS_ID).await.unwrap();

    assert_eq!(shell.id, AAS_ID);
    assert_eq!(shell.id_short.as_deref(), Some("Pump"));
    assert_eq!(shell.submodel_ids().collect::<Vec<_>>(), vec![SUBMODEL_ID]);
    assert_eq!(
        shell.extra.get("modelType"),
        Some(&json!("AssetAdministrationShell"))
    );
}

#[tokio::test]
async fn test_repository_status_codes_map_to_error_codes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/shells/{}", encode_id("missing"))))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/shells/{}", encode_id("secret"))))
        .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
        .mount(&server)
        .await;

    let client = factory()
        .aas_repository_client(&server.uri(), &SecurityConfig::None)
        .unwrap();

    let missing = client.get_shell_by_id("missing").await.unwrap_err();
    assert_eq!(missing.code, ApiErrorCode::NotFound);

    let secret = client.get_shell_by_id("secret").await.unwrap_err();
    assert_eq!(secret.code, ApiErrorCode::Unauthorized);
    assert!(secret.message.contains("token expired"));
}

#[tokio::test]
async fn test_invalid_body_is_internal_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>login</html>"))
        .mount(&server)
        .await;

    let client = factory()
        .submodel_repository_client(&server.uri(), &SecurityConfig::None)
        .unwrap();
    let err = client.get_submodel_by_id(SUBMODEL_ID).await.unwrap_err();

    assert_eq!(err.code, ApiErrorCode::InternalServerError);
}

#[tokio::test]
async fn test_unreachable_service_is_not_found() {
    let client = factory()
        .aas_repository_client("http://127.0.0.1:9", &SecurityConfig::None)
        .unwrap();
    let err = client.get_shell_by_id(AAS_ID).await.unwrap_err();

    assert_eq!(err.code, ApiErrorCode::NotFound);
}

#[tokio::test]
async fn test_discovery_lookup_query() {
    let server = MockServer::start().await;
    let asset_query = encode_id(&json!({ "name": "globalAssetId", "value": ASSET_ID }).to_string());
    Mock::given(method("GET"))
        .and(path("/lookup/shells"))
        .and(query_param("assetIds", asset_query.as_str()))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "paging_metadata": {}, "result": [AAS_ID] })),
        )
        .mount(&server)
        .await;

    let client = factory()
        .discovery_client(&server.uri(), &SecurityConfig::None)
        .unwrap();

    assert_eq!(client.get_aas_ids_by_asset_id(ASSET_ID).await.unwrap(), vec![AAS_ID]);
}

#[tokio::test]
async fn test_empty_discovery_answer_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lookup/shells"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": [] })))
        .mount(&server)
        .await;

    let client = factory()
        .discovery_client(&server.uri(), &SecurityConfig::None)
        .unwrap();
    let err = client.get_aas_ids_by_asset_id(ASSET_ID).await.unwrap_err();

    assert_eq!(err.code, ApiErrorCode::NotFound);
}

#[tokio::test]
async fn test_header_security_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("X-API-KEY", "s3cret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": SUBMODEL_ID })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let client = factory()
        .submodel_repository_client(
            &server.uri(),
            &SecurityConfig::Header {
                name: "X-API-KEY".to_string(),
                value: "s3cret".to_string(),
            },
        )
        .unwrap();

    assert_eq!(client.get_submodel_by_id(SUBMODEL_ID).await.unwrap().id, SUBMODEL_ID);
}

#[tokio::test]
async fn test_registry_descriptor_by_encoded_id() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/shell-descriptors/{}", encode_id(AAS_ID))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": AAS_ID,
            "endpoints": [{
                "interface": "AAS-3.0",
                "protocolInformation": {
                    "href": format!("http://repo:8081/shells/{}", encode_id(AAS_ID)),
                    "endpointProtocol": "HTTP"
                }
            }],
            "submodelDescriptors": []
        })))
        .mount(&server)
        .await;

    let client = factory()
        .aas_registry_client(&server.uri(), &SecurityConfig::None)
        .unwrap();
    let descriptor = client.get_shell_descriptor_by_id(AAS_ID).await.unwrap();

    assert_eq!(
        descriptor.first_endpoint_href(),
        Some(format!("http://repo:8081/shells/{}", encode_id(AAS_ID)).as_str())
    );
}

#[tokio::test]
async fn test_full_search_over_http_registry() {
    let registry = MockServer::start().await;
    let repository = MockServer::start().await;
    let href = format!("{}/shells/{}", repository.uri(), encode_id(AAS_ID));

    Mock::given(method("GET"))
        .and(path(format!("/shell-descriptors/{}", encode_id(AAS_ID))))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": AAS_ID,
            "endpoints": [{
                "interface": "AAS-3.0",
                "protocolInformation": { "href": href }
            }]
        })))
        .mount(&registry)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/shells/{}", encode_id(AAS_ID))))
        .respond_with(ResponseTemplate::new(200).set_body_json(shell_json(AAS_ID)))
        .expect(1)
        .mount(&repository)
        .await;

    let infra = InfrastructureConnection::new("plant")
        .with_aas_registry(registry.uri())
        .with_aas_repository(repository.uri());
    let searcher = AasSearcher::new(
        Arc::new(StaticInfrastructureStore::new(Some(infra), vec![])),
        Arc::new(factory()),
    );

    let result = searcher.perform_full_search(AAS_ID).await.unwrap();

    assert_eq!(result.redirect_url, format!("/viewer/{}", encode_id(AAS_ID)));
    assert_eq!(
        result.aas_data.unwrap().aas_repository_origin,
        Some(repository.uri())
    );
}
