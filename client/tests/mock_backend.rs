//! End-to-end tests against a mock Composio backend. Both API generations
//! are pointed at the same mock server; paths keep them apart.

use composio_client::{ComposioClient, ConnectionFilter, NotionClient, ZoomClient};
use composio_core::Error;
use composio_core::manage::AccountStatus;
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn client_for(server: &MockServer) -> ComposioClient {
    ComposioClient::with_hosts("test-key", server.uri(), server.uri()).unwrap()
}

#[tokio::test]
async fn execute_action_bridges_new_scheme_id_to_legacy_uuid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connected_accounts/ca_123"))
        .and(header("X-API-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "ca_123",
            "status": "ACTIVE",
            "toolkit": {"slug": "notion"},
            "deprecated": {"uuid": "legacy-1"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    // The execute body must carry the legacy UUID, not the ca_ id.
    Mock::given(method("POST"))
        .and(path("/actions/NOTION_GET_ABOUT_ME/execute"))
        .and(body_partial_json(json!({"connectedAccountId": "legacy-1"})))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"id": "u1"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let account = client.get_connection("ca_123").await.unwrap();
    assert_eq!(account.status, AccountStatus::Active);
    assert_eq!(account.toolkit_slug.as_deref(), Some("notion"));
    assert_eq!(account.deprecated_uuid.as_deref(), Some("legacy-1"));

    let result = client
        .execute_action("NOTION_GET_ABOUT_ME", "ca_123", json!({}))
        .await
        .unwrap();
    assert_eq!(result["data"]["id"], json!("u1"));
}

#[tokio::test]
async fn execute_action_fails_when_account_has_no_legacy_uuid() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connected_accounts/ca_new"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"id": "ca_new", "status": "ACTIVE"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client
        .execute_action("NOTION_GET_ABOUT_ME", "ca_new", json!({}))
        .await
    {
        Err(Error::UnresolvableIdentifier { id }) => assert_eq!(id, "ca_new"),
        other => panic!("expected UnresolvableIdentifier, got {other:?}"),
    }
}

#[tokio::test]
async fn notion_page_normalizes_title_and_parent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/actions/NOTION_FETCH_BLOCK_METADATA/execute"))
        .and(body_partial_json(
            json!({"connectedAccountId": "legacy-9", "input": {"block_id": "p1"}}),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": "p1",
                "url": "https://notion.so/p1",
                "properties": {
                    "Name": {
                        "type": "title",
                        "title": [{"plain_text": "A"}, {"plain_text": "B"}]
                    }
                },
                "parent": {"type": "database_id", "database_id": "D1"},
                "icon": {"type": "emoji", "emoji": "📘"}
            }
        })))
        .mount(&server)
        .await;

    let notion = NotionClient::new(client_for(&server).await, "legacy-9");
    let page = notion.get_page("p1").await.unwrap();
    assert_eq!(page.title.as_deref(), Some("AB"));
    assert_eq!(page.parent_type.as_deref(), Some("database_id"));
    assert_eq!(page.parent_id.as_deref(), Some("D1"));
    assert_eq!(page.icon.as_deref(), Some("📘"));
}

#[tokio::test]
async fn zoom_recordings_listing_defers_files_to_detail_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/actions/ZOOM_LIST_ALL_RECORDINGS/execute"))
        .and(body_partial_json(json!({"input": {"from": "2026-01-01"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "meetings": [
                    {"id": 42, "topic": "Sync", "start_time": "2026-01-02T10:00:00Z", "duration": 30}
                ]
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/actions/ZOOM_GET_MEETING_RECORDINGS/execute"))
        .and(body_partial_json(json!({"input": {"meetingId": 42}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "id": 42,
                "topic": "Sync",
                "start_time": "2026-01-02T10:00:00Z",
                "duration": 30,
                "recording_files": [{"id": "f1", "file_type": "MP4", "file_size": 9}]
            }
        })))
        .mount(&server)
        .await;

    let zoom = ZoomClient::new(client_for(&server).await, "legacy-z");
    let listed = zoom.list_recordings("2026-01-01", None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].files.is_empty());

    let detail = zoom.get_recording(42).await.unwrap();
    assert_eq!(detail.files.len(), 1);
    assert_eq!(detail.files[0].file_type, "MP4");
}

#[tokio::test]
async fn list_toolkits_passes_search_and_unwraps_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/toolkits"))
        .and(query_param("search", "notion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"slug": "notion", "name": "Notion", "auth_schemes": ["OAUTH2"]}
            ]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let toolkits = client.list_toolkits(Some("notion")).await.unwrap();
    assert_eq!(toolkits.len(), 1);
    assert_eq!(toolkits[0].slug, "notion");
}

#[tokio::test]
async fn list_connections_applies_filters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/connected_accounts"))
        .and(query_param("toolkit_slug", "zoom"))
        .and(query_param("status", "ACTIVE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"id": "ca_7", "status": "ACTIVE", "toolkit": {"slug": "zoom"}}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let filter = ConnectionFilter {
        toolkit_slug: Some("zoom".to_string()),
        status: Some("ACTIVE".to_string()),
        user_id: None,
    };
    let accounts = client.list_connections(&filter).await.unwrap();
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, "ca_7");
}

#[tokio::test]
async fn non_2xx_surfaces_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/auth_configs/ac_missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such auth config"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    match client.get_auth_config("ac_missing").await {
        Err(Error::Http { status, body }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such auth config");
        }
        other => panic!("expected Http error, got {other:?}"),
    }
}

#[tokio::test]
async fn delete_returns_empty_object_on_204() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/connected_accounts/legacy-3"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client.delete_connection("legacy-3").await.unwrap();
    assert_eq!(result, json!({}));
}
