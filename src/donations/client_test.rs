use super::*;
use crate::donations::types::Quantity;
use crate::test_support::serve;

use std::sync::{Arc, Mutex};

use axum::Json;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;

const KEY: &str = "anon-key";

#[derive(Default)]
struct Stub {
    rows: Mutex<Vec<serde_json::Value>>,
    last_prefer: Mutex<Option<String>>,
    reject_next_insert: Mutex<bool>,
}

fn authorized(headers: &HeaderMap) -> bool {
    let read = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    read("apikey") == Some(KEY) && read("authorization") == Some("Bearer anon-key")
}

async fn list(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Query(params): Query<std::collections::HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, r#"{"message":"Invalid API key"}"#.into()));
    }
    let rows = stub.rows.lock().unwrap().clone();
    let selected = match params.get("select").map(String::as_str) {
        Some("*") => rows,
        Some("tipo_doacao,quantidade") => rows
            .into_iter()
            .map(|r| serde_json::json!({ "tipo_doacao": r["tipo_doacao"], "quantidade": r["quantidade"] }))
            .collect(),
        other => return Err((StatusCode::BAD_REQUEST, format!("unexpected select {other:?}"))),
    };
    Ok(Json(serde_json::Value::Array(selected)))
}

async fn insert(
    State(stub): State<Arc<Stub>>,
    headers: HeaderMap,
    Json(row): Json<serde_json::Value>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !authorized(&headers) {
        return Err((StatusCode::UNAUTHORIZED, "no key".into()));
    }
    *stub.last_prefer.lock().unwrap() = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    if std::mem::take(&mut *stub.reject_next_insert.lock().unwrap()) {
        return Err((StatusCode::BAD_REQUEST, r#"{"code":"23502","message":"null value in column"}"#.into()));
    }
    stub.rows.lock().unwrap().push(row);
    Ok(StatusCode::CREATED)
}

async fn start(stub: Arc<Stub>) -> String {
    let router = axum::Router::new()
        .route("/rest/v1/doacoes", get(list).post(insert))
        .with_state(stub);
    serve(router).await
}

fn sample() -> NewDonation {
    NewDonation {
        donor_name: "Maria".into(),
        contact: "maria@x.test".into(),
        kind: "Alimento".into(),
        quantity: 3,
        date: "2026-03-01".into(),
    }
}

#[tokio::test]
async fn create_then_list_round_trips_through_backend() {
    let stub = Arc::new(Stub::default());
    let base = start(stub.clone()).await;
    let client = RestClient::new(reqwest::Client::new(), &base, KEY.into());

    client.create_donation(&sample()).await.unwrap();
    assert_eq!(stub.last_prefer.lock().unwrap().as_deref(), Some("return=minimal"));

    let rows = client.list_donations().await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].donor_name.as_deref(), Some("Maria"));
    assert_eq!(rows[0].quantity.as_ref().and_then(|q| q.as_int()), Some(3));
}

#[tokio::test]
async fn tally_rows_select_only_two_columns() {
    let stub = Arc::new(Stub::default());
    stub.rows.lock().unwrap().push(serde_json::json!({
        "nome": "Ana", "contato": "-", "tipo_doacao": "Roupa", "quantidade": "2", "data_doacao": "2026-03-02"
    }));
    let base = start(stub).await;
    let client = RestClient::new(reqwest::Client::new(), &base, KEY.into());

    let rows = client.list_tally_rows().await.unwrap();
    assert_eq!(rows, vec![TallyRow { kind: Some("Roupa".into()), quantity: Some(Quantity::Text("2".into())) }]);
}

#[tokio::test]
async fn rejected_insert_carries_raw_body() {
    let stub = Arc::new(Stub::default());
    *stub.reject_next_insert.lock().unwrap() = true;
    let base = start(stub.clone()).await;
    let client = RestClient::new(reqwest::Client::new(), &base, KEY.into());

    let err = client.create_donation(&sample()).await.unwrap_err();
    match err {
        DonationError::Api { status, body } => {
            assert_eq!(status, 400);
            assert!(body.contains("23502"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
    assert!(stub.rows.lock().unwrap().is_empty());
}

#[tokio::test]
async fn wrong_key_is_api_error() {
    let base = start(Arc::new(Stub::default())).await;
    let client = RestClient::new(reqwest::Client::new(), &base, "other".into());
    let err = client.list_donations().await.unwrap_err();
    assert!(matches!(err, DonationError::Api { status: 401, .. }));
}

#[tokio::test]
async fn non_list_body_is_decode_error() {
    let router =
        axum::Router::new().route("/rest/v1/doacoes", get(|| async { Json(serde_json::json!({ "oops": 1 })) }));
    let base = serve(router).await;
    let client = RestClient::new(reqwest::Client::new(), &base, KEY.into());
    assert!(matches!(client.list_tally_rows().await, Err(DonationError::Decode(_))));
}

#[tokio::test]
async fn unreachable_backend_is_request_error() {
    let client = RestClient::new(reqwest::Client::new(), "http://127.0.0.1:9", KEY.into());
    assert!(matches!(client.list_donations().await, Err(DonationError::Request(_))));
}
