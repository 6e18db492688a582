// Integration tests for `ApiClient` using wiremock.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::SecretString;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use slate_api::{
    ApiClient, Cents, CreateInviteRequest, CreateTransactionRequest, Error, InvoiceFilter,
    InvoiceStatus, Method, ResendInviteResponse, SessionToken, StaticToken, TeamRole, Transaction,
    TransactionKind, paths,
};

// ── Helpers ─────────────────────────────────────────────────────────

fn token() -> Arc<StaticToken> {
    Arc::new(StaticToken::new(SecretString::from("test-token".to_string())))
}

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let client = ApiClient::with_client(&server.uri(), reqwest::Client::new(), token()).unwrap();
    (server, client)
}

fn invoice_json(id: Uuid, org: Uuid, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "organization_id": org,
        "number": "INV-2024-001",
        "status": status,
        "currency": "EUR",
        "total_cents": 150_000,
        "paid_cents": 0
    })
}

// ── Happy paths ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_invoices_sends_bearer_and_filters() {
    let (server, client) = setup().await;
    let org = Uuid::new_v4();
    let inv = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/invoices"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("organization_id", org.to_string().as_str()))
        .and(query_param("status", "paid"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([invoice_json(inv, org, "paid")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let filter = InvoiceFilter {
        status: Some(InvoiceStatus::Paid),
        ..InvoiceFilter::default()
    };
    let invoices = client.list_invoices(org, &filter).await.unwrap();

    assert_eq!(invoices.len(), 1);
    assert_eq!(invoices[0].id, inv);
    assert_eq!(invoices[0].total_cents, Cents(150_000));
}

#[tokio::test]
async fn test_base_path_is_preserved() {
    let server = MockServer::start().await;
    let base = format!("{}/api/v1", server.uri());
    let client = ApiClient::with_client(&base, reqwest::Client::new(), token()).unwrap();
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/api/v1/bank-accounts/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": id,
            "organization_id": Uuid::new_v4(),
            "name": "Production account",
            "currency": "EUR",
            "balance_cents": 500_000
        })))
        .mount(&server)
        .await;

    let account = client.get_bank_account(id).await.unwrap();
    assert_eq!(account.balance_cents, Cents(500_000));
}

#[tokio::test]
async fn test_create_transaction_posts_type_field() {
    let (server, client) = setup().await;
    let org = Uuid::new_v4();
    let tx = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .and(body_json(json!({
            "organization_id": org,
            "type": "income",
            "amount_cents": 10_000,
            "description": "Festival screening fee"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": tx,
            "organization_id": org,
            "type": "income",
            "amount_cents": 10_000,
            "description": "Festival screening fee"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let body = serde_json::to_value(CreateTransactionRequest {
        organization_id: org,
        kind: TransactionKind::Income,
        amount_cents: Cents(10_000),
        bank_account_id: None,
        invoice_id: None,
        project_id: None,
        description: Some("Festival screening fee".into()),
        occurred_on: None,
    })
    .unwrap();
    let value = client
        .send_json(Method::POST, paths::TRANSACTIONS, Some(&body))
        .await
        .unwrap();

    let created: Transaction = serde_json::from_value(value).unwrap();
    assert_eq!(created.id, tx);
    assert_eq!(created.kind, TransactionKind::Income);
}

#[tokio::test]
async fn test_resend_invite_posts_without_body() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("POST"))
        .and(path(format!("/invites/{id}/resend")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "invite_link": "https://app.slate.test/join/abc" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let value = client
        .send_json(Method::POST, &paths::invite_resend(id), None)
        .await
        .unwrap();
    let resp: ResendInviteResponse = serde_json::from_value(value).unwrap();
    assert_eq!(resp.invite_link, "https://app.slate.test/join/abc");

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_delete_with_empty_body() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("DELETE"))
        .and(path(format!("/invoices/{id}")))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let value = client
        .send_json(Method::DELETE, &paths::item(paths::INVOICES, id), None)
        .await
        .unwrap();
    assert!(value.is_null());
}

#[tokio::test]
async fn test_send_json_untyped() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/projects/p1"))
        .and(body_json(json!({ "name": "Night Shift" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let value = client
        .send_json(Method::PATCH, "/projects/p1", Some(&json!({ "name": "Night Shift" })))
        .await
        .unwrap();
    assert_eq!(value, json!({ "ok": true }));
}

// ── Authentication ──────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_session_is_rejected_locally() {
    let server = MockServer::start().await;
    let session = Arc::new(SessionToken::new());
    let client =
        ApiClient::with_client(&server.uri(), reqwest::Client::new(), session.clone()).unwrap();

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = client.list_team_members(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::Unauthenticated));
    assert!(err.is_auth());
    assert_eq!(err.status_code(), Some(401));
}

#[tokio::test]
async fn test_session_token_is_read_per_request() {
    let server = MockServer::start().await;
    let session = Arc::new(SessionToken::new());
    let client =
        ApiClient::with_client(&server.uri(), reqwest::Client::new(), session.clone()).unwrap();

    Mock::given(method("GET"))
        .and(path("/team-members"))
        .and(header("authorization", "Bearer fresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    session.set(SecretString::from("fresh".to_string()));
    let members = client.list_team_members(Uuid::new_v4()).await.unwrap();
    assert!(members.is_empty());
}

// ── Error normalization ─────────────────────────────────────────────

#[tokio::test]
async fn test_validation_error_with_fields() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/invites"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Invalid invite",
            "errors": { "email": ["is not a valid address"] }
        })))
        .mount(&server)
        .await;

    let body = serde_json::to_value(CreateInviteRequest {
        organization_id: Uuid::new_v4(),
        email: "nope".into(),
        role: TeamRole::Member,
    })
    .unwrap();
    let err = client
        .send_json(Method::POST, paths::INVITES, Some(&body))
        .await
        .unwrap_err();

    assert_eq!(err.status_code(), Some(422));
    assert_eq!(err.message(), "Invalid invite");
    assert_eq!(
        err.validation_errors().unwrap()["email"],
        vec!["is not a valid address".to_owned()]
    );
}

#[tokio::test]
async fn test_conflict_and_limit_reached() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/invites"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "already a member" })),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/projects"))
        .respond_with(
            ResponseTemplate::new(402).set_body_json(json!({ "detail": "project limit reached" })),
        )
        .mount(&server)
        .await;

    let err = client
        .send_json(Method::POST, "invites", Some(&json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict { ref message } if message == "already a member"));

    let err = client
        .send_json(Method::POST, "projects", Some(&json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::LimitReached { .. }));
    assert_eq!(err.status_code(), Some(402));
}

#[tokio::test]
async fn test_not_found() {
    let (server, client) = setup().await;
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path(format!("/invoices/{id}")))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "gone" })))
        .mount(&server)
        .await;

    let err = client.get_invoice(id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.message(), "gone");
}

#[tokio::test]
async fn test_server_error_plain_text_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/projects"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = client.list_projects(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::Server { status: 502, .. }));
    assert_eq!(err.message(), "Bad Gateway");
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_malformed_success_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/suppliers"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client.list_suppliers(Uuid::new_v4()).await.unwrap_err();
    match err {
        Error::Deserialization { body, .. } => assert_eq!(body, "<html>oops</html>"),
        other => panic!("expected Deserialization, got {other:?}"),
    }
}

#[tokio::test]
async fn test_network_error_has_no_status() {
    // Nothing listens on port 1.
    let client =
        ApiClient::with_client("http://127.0.0.1:1", reqwest::Client::new(), token()).unwrap();

    let err = client.list_projects(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, Error::Network { .. }));
    assert_eq!(err.status_code(), None);
}

#[test]
fn test_invalid_base_url() {
    let result = ApiClient::with_client("not a url", reqwest::Client::new(), token());
    assert!(matches!(result, Err(Error::InvalidUrl(_))));
}
