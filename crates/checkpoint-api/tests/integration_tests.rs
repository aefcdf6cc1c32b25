//! # Integration Tests for checkpoint-api
//!
//! Drives the full router in-process: the crossing lifecycle end to end,
//! anomaly administration, traffic queries, reference data, persons,
//! authentication and role gating, health checks and the OpenAPI document.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use checkpoint_api::state::AppConfig;

const BOUNDARY: &str = "checkpoint-test-boundary";
const VALID_SCAN: &[u8] = b"\x89PNG\r\n passport page";
const BLANK_SCAN: &[u8] = &[0u8; 16];

/// Helper: build the test app with auth disabled and built-in reference data.
fn test_app() -> Router {
    let state = checkpoint_api::bootstrap::bootstrap(AppConfig::default()).unwrap();
    checkpoint_api::app(state)
}

/// Helper: build the test app with auth enabled.
fn test_app_with_auth(token: &str) -> Router {
    let config = AppConfig {
        auth_token: Some(token.to_string()),
        ..AppConfig::default()
    };
    let state = checkpoint_api::bootstrap::bootstrap(config).unwrap();
    checkpoint_api::app(state)
}

/// Helper: send a request, returning status and JSON body (`Null` if empty).
async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    let value = serde_json::from_slice(&bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn with_bearer(mut request: Request<Body>, token: &str) -> Request<Body> {
    request.headers_mut().insert(
        "authorization",
        format!("Bearer {token}").parse().unwrap(),
    );
    request
}

/// Helper: multipart upload with the bytes in field `file`.
fn upload(uri: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"scan.png\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

fn ts(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Id of the first toll office in `country` (upper case).
async fn toll_id(app: &Router, country: &str) -> String {
    let (status, body) = send(app, get("/api/TollOffice")).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .find(|t| t["country"] == country)
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

async fn create_crossing(app: &Router, body: Value) -> Value {
    let (status, crossing) = send(app, json_request("POST", "/api/CrossingInfo", &body)).await;
    assert_eq!(status, StatusCode::CREATED, "{crossing}");
    crossing
}

async fn attach(app: &Router, crossing_id: &str, bytes: &[u8]) -> Value {
    let (status, doc) = send(
        app,
        upload(&format!("/api/CrossingInfo/{crossing_id}/Document"), bytes),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{doc}");
    doc
}

async fn allow_exit(app: &Router, crossing_id: &str, toll: &str, time: Option<DateTime<Utc>>) -> StatusCode {
    let body = time.map(|t| json!(ts(t)).to_string()).unwrap_or_default();
    let request = Request::builder()
        .method("PATCH")
        .uri(format!("/api/CrossingInfo?id={crossing_id}&tollId={toll}"))
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    send(app, request).await.0
}

/// Create a car crossing entered at `entry` and exited at `exit`.
async fn completed_crossing(
    app: &Router,
    transport: &str,
    entry: &str,
    entry_time: DateTime<Utc>,
    exit: &str,
    exit_time: DateTime<Utc>,
) -> String {
    let crossing = create_crossing(
        app,
        json!({
            "passenger_count": 1,
            "transport": transport,
            "entry_toll_id": entry,
            "entry_time": ts(entry_time),
        }),
    )
    .await;
    let id = crossing["id"].as_str().unwrap().to_string();
    attach(app, &id, VALID_SCAN).await;
    assert_eq!(
        allow_exit(app, &id, exit, Some(exit_time)).await,
        StatusCode::NO_CONTENT
    );
    id
}

fn ids(body: &Value) -> Vec<String> {
    let mut ids: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_str().unwrap().to_string())
        .collect();
    ids.sort();
    ids
}

// -- Health & OpenAPI ---------------------------------------------------------

#[tokio::test]
async fn test_health_checks_bypass_auth() {
    let app = test_app_with_auth("s3cret");
    let (status, body) = send(&app, get("/health/liveness")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    let (status, body) = send(&app, get("/health/readiness")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ready");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let (status, body) = send(&test_app(), get("/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/CrossingInfo"].is_object());
}

// -- Scenario A: clean crossing ----------------------------------------------

#[tokio::test]
async fn test_scenario_a_exit_once_then_conflict() {
    let app = test_app();
    let crossing = create_crossing(
        &app,
        json!({"passenger_count": 2, "transport": "car", "entry_toll": {"country": "fr"}}),
    )
    .await;
    assert_eq!(crossing["stage"], "registered");
    assert_eq!(crossing["registered"], true);
    let id = crossing["id"].as_str().unwrap();

    let doc = attach(&app, id, VALID_SCAN).await;
    assert_eq!(doc["verified"], true);
    assert_eq!(doc["anomalies"].as_array().unwrap().len(), 0);

    let gb = toll_id(&app, "GB").await;
    let future = Utc::now() + Duration::days(1);
    assert_eq!(allow_exit(&app, id, &gb, Some(future)).await, StatusCode::NO_CONTENT);
    assert_eq!(allow_exit(&app, id, &gb, Some(future)).await, StatusCode::CONFLICT);

    let (status, body) = send(&app, get(&format!("/api/CrossingInfo/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stage"], "exited");
    assert_eq!(body["valid"], true);
    assert_eq!(body["exit_toll_id"], gb.as_str());
}

// -- Scenario B: failed validation and anomalies ------------------------------

#[tokio::test]
async fn test_scenario_b_forbidden_exit_and_anomaly_admin() {
    let app = test_app();
    let fr = toll_id(&app, "FR").await;
    let gb = toll_id(&app, "GB").await;
    let crossing = create_crossing(
        &app,
        json!({"passenger_count": 1, "transport": "truck", "entry_toll_id": fr}),
    )
    .await;
    let id = crossing["id"].as_str().unwrap();

    let bad = attach(&app, id, BLANK_SCAN).await;
    assert_eq!(bad["verified"], false);
    assert_eq!(bad["anomalies"].as_array().unwrap().len(), 1);
    let good = attach(&app, id, VALID_SCAN).await;
    assert_eq!(good["verified"], true);

    assert_eq!(allow_exit(&app, id, &gb, None).await, StatusCode::FORBIDDEN);

    let good_id = good["id"].as_str().unwrap();
    let (status, created) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/Document/{good_id}/Non-compliant"),
            &json!(["photo mismatch", "expired", "torn page"]),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(created.as_array().unwrap().len(), 3);

    let (status, anomalies) = send(&app, get("/api/DocumentAnomaly")).await;
    assert_eq!(status, StatusCode::OK);
    let anomalies = anomalies.as_array().unwrap().clone();
    assert_eq!(anomalies.len(), 4);

    let victim = anomalies[0]["id"].as_str().unwrap();
    let (status, _) = send(&app, empty_request("DELETE", &format!("/api/DocumentAnomaly/{victim}"))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, anomalies) = send(&app, get("/api/DocumentAnomaly")).await;
    assert_eq!(anomalies.as_array().unwrap().len(), 3);

    let (status, _) = send(&app, get(&format!("/api/DocumentAnomaly/{victim}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, empty_request("DELETE", &format!("/api/DocumentAnomaly/{victim}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_anomaly_report_rejected() {
    let app = test_app();
    let crossing = create_crossing(&app, json!({"passenger_count": 1})).await;
    let doc = attach(&app, crossing["id"].as_str().unwrap(), VALID_SCAN).await;
    let doc_id = doc["id"].as_str().unwrap();
    let uri = format!("/api/Document/{doc_id}/Non-compliant");

    let (status, _) = send(&app, json_request("POST", &uri, &json!([]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send(&app, json_request("POST", &uri, &json!({"anomalies": []}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (_, doc) = send(&app, get(&format!("/api/Document/{doc_id}"))).await;
    assert_eq!(doc["anomalies"].as_array().unwrap().len(), 0);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(
        &app,
        json_request("POST", &format!("/api/Document/{missing}/Non-compliant"), &json!(["x"])),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_anomaly_descriptions_stored_as_sent() {
    let app = test_app();
    let crossing = create_crossing(&app, json!({"passenger_count": 1})).await;
    let doc = attach(&app, crossing["id"].as_str().unwrap(), VALID_SCAN).await;
    let doc_id = doc["id"].as_str().unwrap();

    let (status, created) = send(
        &app,
        json_request(
            "POST",
            &format!("/api/Document/{doc_id}/Non-compliant"),
            &json!({"anomalies": ["torn", " ", "  expired stamp  "]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let descriptions: Vec<&str> = created
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, ["torn", " ", "  expired stamp  "]);

    let (_, doc) = send(&app, get(&format!("/api/Document/{doc_id}"))).await;
    assert_eq!(doc["anomalies"].as_array().unwrap().len(), 3);
}

// -- Lifecycle ordering -------------------------------------------------------

#[tokio::test]
async fn test_create_ignores_entry_time_without_toll() {
    let app = test_app();
    let crossing = create_crossing(
        &app,
        json!({"passenger_count": 1, "entry_time": ts(Utc::now())}),
    )
    .await;
    assert_eq!(crossing["stage"], "created");
    assert!(crossing["entry_time"].is_null());
}

#[tokio::test]
async fn test_registration_validates_pending_documents() {
    let app = test_app();
    let fr = toll_id(&app, "FR").await;
    let crossing = create_crossing(&app, json!({"passenger_count": 3})).await;
    assert_eq!(crossing["stage"], "created");
    let id = crossing["id"].as_str().unwrap();

    let doc = attach(&app, id, VALID_SCAN).await;
    assert_eq!(doc["verified"], false);

    let gb = toll_id(&app, "GB").await;
    assert_eq!(allow_exit(&app, id, &gb, None).await, StatusCode::UNPROCESSABLE_ENTITY);

    let uri = format!("/api/CrossingInfo/{id}/EntryToll?tollId={fr}");
    let (status, _) = send(&app, empty_request("PATCH", &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, empty_request("PATCH", &uri)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, get(&format!("/api/CrossingInfo/{id}"))).await;
    assert_eq!(body["documents"][0]["verified"], true);
    assert_eq!(allow_exit(&app, id, &gb, None).await, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_ids_are_not_found() {
    let app = test_app();
    let missing = uuid::Uuid::new_v4();
    let fr = toll_id(&app, "FR").await;

    let (status, _) = send(&app, get(&format!("/api/CrossingInfo/{missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        empty_request("PATCH", &format!("/api/CrossingInfo/{missing}/EntryToll?tollId={fr}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, upload(&format!("/api/CrossingInfo/{missing}/Document"), VALID_SCAN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        allow_exit(&app, &missing.to_string(), &fr, None).await,
        StatusCode::NOT_FOUND
    );

    let crossing = create_crossing(&app, json!({"passenger_count": 1})).await;
    let id = crossing["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        empty_request("PATCH", &format!("/api/CrossingInfo/{id}/EntryToll?tollId={missing}")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(
        &app,
        json_request("POST", "/api/CrossingInfo", &json!({"passenger_count": 1, "entry_toll_id": missing})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// -- Documents ----------------------------------------------------------------

#[tokio::test]
async fn test_document_image_patch_and_delete() {
    let app = test_app();
    let crossing = create_crossing(
        &app,
        json!({"passenger_count": 1, "entry_toll": {"country": "gb"}}),
    )
    .await;
    let crossing_id = crossing["id"].as_str().unwrap();
    let doc = attach(&app, crossing_id, BLANK_SCAN).await;
    let doc_id = doc["id"].as_str().unwrap();
    assert_eq!(doc["image_size"], BLANK_SCAN.len());

    let response = test_image(&app, doc_id).await;
    assert_eq!(response, BLANK_SCAN);

    let uri = format!("/api/Document/{doc_id}");
    let (status, _) = send(&app, json_request("PATCH", &uri, &json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send(&app, json_request("PATCH", &uri, &json!({"verified": true}))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, doc) = send(&app, get(&uri)).await;
    assert_eq!(doc["verified"], true);
    assert_eq!(doc["anomalies"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, crossing) = send(&app, get(&format!("/api/CrossingInfo/{crossing_id}"))).await;
    assert_eq!(crossing["documents"].as_array().unwrap().len(), 0);
}

async fn test_image(app: &Router, doc_id: &str) -> Vec<u8> {
    let response = app
        .clone()
        .oneshot(get(&format!("/api/Document/{doc_id}/Image")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"],
        "application/octet-stream"
    );
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

#[tokio::test]
async fn test_upload_without_file_field_rejected() {
    let app = test_app();
    let crossing = create_crossing(&app, json!({"passenger_count": 1})).await;
    let id = crossing["id"].as_str().unwrap();
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nhello\r\n--{BOUNDARY}--\r\n"
    );
    let request = Request::builder()
        .method("POST")
        .uri(format!("/api/CrossingInfo/{id}/Document"))
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// -- Listing ------------------------------------------------------------------

#[tokio::test]
async fn test_list_filters_by_toll_and_validation() {
    let app = test_app();
    let fr = toll_id(&app, "FR").await;
    let gb = toll_id(&app, "GB").await;
    let now = Utc::now();

    let done = completed_crossing(&app, "car", &fr, now - Duration::minutes(30), &gb, now - Duration::minutes(5)).await;
    let open = create_crossing(
        &app,
        json!({"passenger_count": 4, "entry_toll_id": gb}),
    )
    .await;
    let open_id = open["id"].as_str().unwrap().to_string();
    create_crossing(&app, json!({"passenger_count": 9})).await;

    let (status, body) = send(&app, get("/api/CrossingInfo")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body), vec![done.clone()]);

    let (_, body) = send(&app, get("/api/CrossingInfo?validatedOnly=false")).await;
    let mut expected = vec![done.clone(), open_id.clone()];
    expected.sort();
    assert_eq!(ids(&body), expected);

    let (_, body) = send(&app, get(&format!("/api/CrossingInfo?validatedOnly=false&tollId={fr}"))).await;
    assert_eq!(ids(&body), vec![done.clone()]);
    let (_, body) = send(&app, get(&format!("/api/CrossingInfo?validatedOnly=false&tollId={gb}"))).await;
    assert_eq!(ids(&body), expected);

    let (_, body) = send(&app, get("/api/CrossingInfo?validatedOnly=false&passengerCountMin=2")).await;
    assert_eq!(ids(&body), vec![open_id]);
    let (_, body) = send(&app, get("/api/CrossingInfo?validatedOnly=false&passengerType=merchandise")).await;
    assert!(body.as_array().unwrap().is_empty());

    let (status, _) = send(&app, get("/api/CrossingInfo?passengerCountMin=lots")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

// -- Scenario C & D: traffic between countries --------------------------------

#[tokio::test]
async fn test_scenario_c_traffic_by_direction_and_window() {
    let app = test_app();
    let fr = toll_id(&app, "FR").await;
    let gb = toll_id(&app, "GB").await;
    let now = Utc::now();
    let start = now - Duration::hours(1);

    let fr_gb_entered = completed_crossing(&app, "car", &fr, now - Duration::minutes(30), &gb, now - Duration::minutes(20)).await;
    let fr_gb_exited = completed_crossing(&app, "truck", &fr, now - Duration::hours(5), &gb, now - Duration::minutes(10)).await;
    let _fr_gb_old = completed_crossing(&app, "car", &fr, now - Duration::hours(5), &gb, now - Duration::hours(4)).await;
    let _fr_gb_train = completed_crossing(&app, "train", &fr, now - Duration::minutes(30), &gb, now - Duration::minutes(20)).await;
    let gb_fr = completed_crossing(&app, "car", &gb, now - Duration::minutes(30), &fr, now - Duration::minutes(20)).await;

    let (status, body) = send(&app, get(&format!("/api/Pass?from=fr&to=gb&start={}", ts(start)))).await;
    assert_eq!(status, StatusCode::OK);
    let mut expected = vec![fr_gb_entered, fr_gb_exited];
    expected.sort();
    assert_eq!(ids(&body), expected);

    let (_, body) = send(&app, get(&format!("/api/Pass?from=GB&to=FR&start={}", ts(start)))).await;
    assert_eq!(ids(&body), vec![gb_fr]);

    let (_, body) = send(&app, get("/api/Pass?from=fr&to=gb")).await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_scenario_d_invalid_traffic_queries() {
    let app = test_app();
    let now = Utc::now();
    let cases = [
        "/api/Pass?from=fr".to_string(),
        "/api/Pass?to=gb".to_string(),
        "/api/Pass?from=fra&to=gb".to_string(),
        format!("/api/Pass?from=fr&to=gb&end={}", ts(now)),
        format!(
            "/api/Pass?from=fr&to=gb&start={}&end={}",
            ts(now),
            ts(now - Duration::hours(1))
        ),
        "/api/Pass?from=fr&to=gb&start=yesterday".to_string(),
    ];
    for uri in cases {
        let (status, body) = send(&app, get(&uri)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

// -- Reference data -----------------------------------------------------------

#[tokio::test]
async fn test_required_documents() {
    let app = test_app();
    let (status, body) = send(
        &app,
        get("/api/RequiredDocument?nationality=fr&origin=FR&destination=gb"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 4);

    for uri in [
        "/api/RequiredDocument?nationality=fr&origin=zz&destination=gb",
        "/api/RequiredDocument?nationality=fr&destination=gb",
        "/api/RequiredDocument?nationality=france&origin=fr&destination=gb",
    ] {
        let (status, _) = send(&app, get(uri)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{uri}");
    }
}

#[tokio::test]
async fn test_toll_office_admin() {
    let app = test_app();
    let (status, toll) = send(
        &app,
        json_request("POST", "/api/TollOffice", &json!({"country": "de"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(toll["country"], "DE");
    let id = toll["id"].as_str().unwrap();
    let (status, fetched) = send(&app, get(&format!("/api/TollOffice/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], id);

    let (status, _) = send(
        &app,
        json_request("POST", "/api/TollOffice", &json!({"country": "deu"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (_, all) = send(&app, get("/api/TollOffice")).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

// -- Persons ------------------------------------------------------------------

#[tokio::test]
async fn test_person_photo_match_and_history() {
    let app = test_app();
    let (status, _) = send(&app, upload("/api/Person/GetPhoto", b"face")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, person) = send(&app, upload("/api/Person", b"reference face")).await;
    assert_eq!(status, StatusCode::CREATED);
    let person_id = person["id"].as_str().unwrap();

    let crossing = create_crossing(
        &app,
        json!({"passenger_count": 1, "person_id": person_id}),
    )
    .await;

    let (status, matched) = send(&app, upload("/api/Person/GetPhoto", b"face")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(matched["person_id"], person_id);

    let (status, history) = send(&app, get(&format!("/api/Person/{person_id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&history), vec![crossing["id"].as_str().unwrap().to_string()]);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(&app, get(&format!("/api/Person/{missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_person_patch_relinks_crossings() {
    let app = test_app();
    let (_, person) = send(&app, upload("/api/Person", b"reference face")).await;
    let person_id = person["id"].as_str().unwrap();
    let first = create_crossing(&app, json!({"passenger_count": 1, "person_id": person_id})).await;
    let second = create_crossing(&app, json!({"passenger_count": 2})).await;
    let second_id = second["id"].as_str().unwrap();
    let uri = format!("/api/Person/{person_id}");

    let (status, _) = send(
        &app,
        json_request("PATCH", &uri, &json!({"crossing_ids": [second_id]})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (_, history) = send(&app, get(&uri)).await;
    assert_eq!(ids(&history), vec![second_id.to_string()]);
    let (_, first) = send(&app, get(&format!("/api/CrossingInfo/{}", first["id"].as_str().unwrap()))).await;
    assert!(first["person_id"].is_null());

    let (status, _) = send(&app, json_request("PATCH", &uri, &json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let (status, _) = send(
        &app,
        json_request("PATCH", &uri, &json!({"crossing_ids": [uuid::Uuid::new_v4()]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let missing = uuid::Uuid::new_v4();
    let (status, _) = send(
        &app,
        json_request("PATCH", &format!("/api/Person/{missing}"), &json!({"crossing_ids": []})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// -- Authentication & roles ---------------------------------------------------

#[tokio::test]
async fn test_gated_routes_require_authentication() {
    let app = test_app_with_auth("s3cret");
    let (status, body) = send(&app, get("/api/CrossingInfo")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    let (status, _) = send(&app, get("/api/DocumentAnomaly")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(
        &app,
        json_request("POST", "/api/CrossingInfo", &json!({"passenger_count": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_open_routes_serve_anonymous_callers() {
    let app = test_app_with_auth("s3cret");
    let (status, _) = send(&app, get("/api/TollOffice")).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        get("/api/RequiredDocument?nationality=fr&origin=fr&destination=gb"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_roles_are_enforced() {
    let app = test_app_with_auth("s3cret");
    let officer = "customs_officer::s3cret";
    let admin = "administrator::s3cret";

    let (status, _) = send(&app, with_bearer(get("/api/CrossingInfo"), admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, with_bearer(get("/api/CrossingInfo"), officer)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, with_bearer(get("/api/DocumentAnomaly"), officer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, with_bearer(get("/api/DocumentAnomaly"), admin)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, with_bearer(get("/api/CrossingInfo"), "wrong")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, with_bearer(get("/api/CrossingInfo"), "s3cret")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_exit_requires_officer() {
    let app = test_app_with_auth("s3cret");
    let officer = "customs_officer::s3cret";
    let admin = "administrator::s3cret";
    let (status, crossing) = send(
        &app,
        with_bearer(
            json_request(
                "POST",
                "/api/CrossingInfo",
                &json!({"passenger_count": 1, "entry_toll": {"country": "fr"}}),
            ),
            officer,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = crossing["id"].as_str().unwrap();
    let toll = crossing["entry_toll_id"].as_str().unwrap();
    let uri = format!("/api/CrossingInfo?id={id}&tollId={toll}");

    let (status, _) = send(&app, empty_request("PATCH", &uri)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = send(&app, with_bearer(empty_request("PATCH", &uri), admin)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    // Authorized, but no documents attached.
    let (status, body) = send(&app, with_bearer(empty_request("PATCH", &uri), officer)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["error"]["message"].as_str().unwrap().contains("no documents"));
}

#[tokio::test]
async fn test_upload_over_body_limit_rejected() {
    let config = AppConfig {
        max_upload_bytes: 64,
        ..AppConfig::default()
    };
    let state = checkpoint_api::bootstrap::bootstrap(config).unwrap();
    let app = checkpoint_api::app(state);
    let (status, _) = send(&app, upload("/api/Person", &[7u8; 1024])).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
}
