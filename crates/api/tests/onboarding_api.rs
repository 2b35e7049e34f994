//! Integration tests for the onboarding wizard endpoints.

mod common;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use common::{
    approved_seller, body_json, build_test_app, get, post, post_json, post_multipart, put_json,
    start_session, test_state,
};
use origen_api::state::AppState;
use origen_core::seller_status::SellerStatus;
use serde_json::{json, Value};

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake-image";
const PDF: &[u8] = b"%PDF-1.4 fake-document";

fn location() -> Value {
    json!({
        "step": "location",
        "data": {
            "address": "Camino de la Vega 12",
            "city": "Aranjuez",
            "province": "madrid",
            "postalCode": "28300",
            "categories": ["vegetales", "frutas"]
        }
    })
}

fn story() -> Value {
    json!({
        "step": "story",
        "data": {
            "businessName": "Huerta del Jarama",
            "tagline": "Verdura de temporada",
            "description": "Tres generaciones cultivando la vega del Jarama con riego tradicional.",
            "teamSize": "2-5",
            "values": ["km0", "familiar"]
        }
    })
}

fn capacity() -> Value {
    json!({
        "step": "capacity",
        "data": {
            "productionVolume": "300 kg/semana",
            "shippingMethods": ["courier", "pickup"],
            "deliveryZones": ["madrid", "toledo"],
            "preparationDays": 2
        }
    })
}

/// The account fields are what a tampered form would claim; the server
/// ignores them.
fn payments(accept_terms: bool) -> Value {
    json!({
        "step": "payments",
        "data": {
            "stripeConnected": true,
            "stripeAccountId": "acct_mock_1",
            "acceptTerms": accept_terms
        }
    })
}

async fn put_step(state: &AppState, session: i64, payload: Value) -> Value {
    let response = put_json(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/step-data"),
        payload,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn next(state: &AppState, session: i64) -> (StatusCode, Value) {
    let response = post(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/next"),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn upload(state: &AppState, session: i64, slot: &str, file: (&str, &str, &[u8])) -> Value {
    let response = post_multipart(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/files/{slot}"),
        &[file],
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Connect the seller's payment account through the API.
async fn connect_payments(state: &AppState, seller: i64) -> String {
    let response = post_json(
        build_test_app(state.clone()),
        "/api/stripe/connect",
        json!({
            "sellerId": seller,
            "email": "lucia@huerta.es",
            "businessName": "Huerta del Jarama"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]["accountId"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Connect the seller, fill every step and stop on the payments step with
/// a valid payload.
async fn drive_to_payments(state: &AppState, seller: i64, session: i64) {
    connect_payments(state, seller).await;
    fill_steps_before_payments(state, session).await;
    put_step(state, session, payments(true)).await;
}

/// Fill the first five steps and move on to payments.
async fn fill_steps_before_payments(state: &AppState, session: i64) {
    put_step(state, session, location()).await;
    assert_eq!(next(state, session).await.0, StatusCode::OK);

    put_step(state, session, story()).await;
    assert_eq!(next(state, session).await.0, StatusCode::OK);

    upload(state, session, "logo", ("logo.png", "image/png", PNG)).await;
    upload(state, session, "product-images", ("tomate.png", "image/png", PNG)).await;
    assert_eq!(next(state, session).await.0, StatusCode::OK);

    put_step(state, session, capacity()).await;
    assert_eq!(next(state, session).await.0, StatusCode::OK);

    upload(state, session, "identity-document", ("dni.pdf", "application/pdf", PDF)).await;
    upload(
        state,
        session,
        "sanitary-registration",
        ("rgseaa.pdf", "application/pdf", PDF),
    )
    .await;
    assert_eq!(next(state, session).await.0, StatusCode::OK);
}

async fn get_session(state: &AppState, session: i64) -> Value {
    let response = get(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

async fn complete(state: &AppState, session: i64) -> (StatusCode, Value) {
    let response = post(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/complete"),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

async fn seller_status(state: &AppState, seller: i64) -> String {
    let json = body_json(get(build_test_app(state.clone()), &format!("/api/sellers/{seller}/status")).await).await;
    json["data"]["status"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Session creation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_session_starts_on_first_step() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;

    let response = post_json(
        build_test_app(state.clone()),
        "/api/onboarding-sessions",
        json!({ "sellerId": seller }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let session = &json["data"];
    assert_eq!(session["sellerId"], seller);
    assert_eq!(session["status"], "in_progress");
    assert_eq!(session["currentStep"], "location");
    assert_eq!(session["currentStepIndex"], 0);
    assert_eq!(session["totalSteps"], 6);
    assert_eq!(session["canGoBack"], false);
    assert_eq!(session["canGoNext"], false);
    assert_eq!(session["steps"].as_array().unwrap().len(), 6);

    assert_eq!(seller_status(&state, seller).await, "onboarding_in_progress");
}

#[tokio::test]
async fn create_session_resumes_the_active_one() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let first = start_session(&state, seller).await;

    let response = post_json(
        build_test_app(state),
        "/api/onboarding-sessions",
        json!({ "sellerId": seller }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["id"], first);
}

#[tokio::test]
async fn pending_seller_cannot_start_onboarding() {
    let state = test_state();
    let seller = common::register_seller(&state, "lucia@huerta.es").await;

    let response = post_json(
        build_test_app(state),
        "/api/onboarding-sessions",
        json!({ "sellerId": seller }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn unknown_session_is_404() {
    let response = get(build_test_app(test_state()), "/api/onboarding-sessions/77").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn next_is_blocked_with_field_errors_until_step_is_valid() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;

    let (status, json) = next(&state, session).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert!(json["fields"]["address"].is_string());
    assert!(json["fields"]["postalCode"].is_string());

    let mut bad_postal = location();
    bad_postal["data"]["postalCode"] = json!("2830");
    let snapshot = put_step(&state, session, bad_postal).await;
    assert_eq!(snapshot["data"]["isValid"], false);
    assert!(snapshot["data"]["fieldErrors"]["postalCode"].is_string());

    let snapshot = put_step(&state, session, location()).await;
    assert_eq!(snapshot["data"]["isValid"], true);
    assert_eq!(snapshot["data"]["canGoNext"], true);

    let (status, json) = next(&state, session).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["currentStep"], "story");
    assert_eq!(json["data"]["steps"][0]["complete"], true);
}

#[tokio::test]
async fn back_keeps_payloads() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;
    put_step(&state, session, location()).await;
    next(&state, session).await;
    put_step(&state, session, story()).await;

    let response = post(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/back"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["currentStep"], "location");
    assert_eq!(json["data"]["data"]["story"]["teamSize"], "2-5");

    let (_, json) = next(&state, session).await;
    assert_eq!(json["data"]["currentStep"], "story");
    assert_eq!(json["data"]["isValid"], true);
}

#[tokio::test]
async fn back_on_first_step_is_rejected() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;

    let response = post(
        build_test_app(state),
        &format!("/api/onboarding-sessions/{session}/back"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_current_step_can_be_edited() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;

    let response = put_json(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/step-data"),
        payments(true),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(
        get(
            build_test_app(state),
            &format!("/api/onboarding-sessions/{session}"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["data"]["payments"]["acceptTerms"], false);
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn complete_is_rejected_before_the_last_step() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;
    put_step(&state, session, location()).await;

    let response = post(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/complete"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(seller_status(&state, seller).await, "onboarding_in_progress");
}

#[tokio::test]
async fn full_wizard_completes_and_sends_seller_to_verification() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;
    drive_to_payments(&state, seller, session).await;

    let json = body_json(
        get(
            build_test_app(state.clone()),
            &format!("/api/onboarding-sessions/{session}"),
        )
        .await,
    )
    .await;
    assert_eq!(json["data"]["currentStep"], "payments");
    assert_eq!(json["data"]["progressPercent"], 100.0);
    assert_eq!(json["data"]["canComplete"], true);

    let response = post(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/complete"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["submitting"], false);
    assert!(json["data"]["lastError"].is_null());

    assert_eq!(seller_status(&state, seller).await, "pending_verification");

    // A completed session is read-only.
    let (status, _) = next(&state, session).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn complete_with_invalid_last_step_is_rejected() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;
    drive_to_payments(&state, seller, session).await;
    put_step(&state, session, payments(false)).await;

    let response = post(
        build_test_app(state),
        &format!("/api/onboarding-sessions/{session}/complete"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["fields"]["acceptTerms"].is_string());
}

#[tokio::test]
async fn failed_submit_records_last_error_and_stays_on_last_step() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;
    drive_to_payments(&state, seller, session).await;

    // The seller was suspended meanwhile, so the verification hand-off fails.
    state
        .store
        .update_seller_status(seller, SellerStatus::Suspended)
        .await
        .unwrap();

    let response = post(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/complete"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(
        get(
            build_test_app(state),
            &format!("/api/onboarding-sessions/{session}"),
        )
        .await,
    )
    .await;
    let snapshot = &json["data"];
    assert_eq!(snapshot["status"], "in_progress");
    assert_eq!(snapshot["currentStep"], "payments");
    assert_eq!(snapshot["submitting"], false);
    assert!(snapshot["lastError"].as_str().unwrap().contains("suspended"));
    assert_eq!(snapshot["canComplete"], true);
}

#[tokio::test]
async fn complete_without_a_connected_account_is_rejected() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;
    fill_steps_before_payments(&state, session).await;

    // The form claims a connected account that the seller never linked.
    let snapshot = put_step(&state, session, payments(true)).await;
    assert_eq!(snapshot["data"]["data"]["payments"]["stripeConnected"], false);
    assert!(snapshot["data"]["data"]["payments"]["stripeAccountId"].is_null());
    assert_eq!(snapshot["data"]["canComplete"], false);

    let (status, json) = complete(&state, session).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["fields"]["stripeConnected"].is_string());

    assert_eq!(seller_status(&state, seller).await, "onboarding_in_progress");
    let json = body_json(
        get(build_test_app(state.clone()), &format!("/api/sellers/{seller}")).await,
    )
    .await;
    assert!(json["data"]["stripeAccountId"].is_null());
    assert_eq!(get_session(&state, session).await["data"]["status"], "in_progress");
}

#[tokio::test]
async fn connect_links_the_session_in_progress() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;

    let account_id = connect_payments(&state, seller).await;

    let json = get_session(&state, session).await;
    assert_eq!(json["data"]["data"]["payments"]["stripeConnected"], true);
    assert_eq!(json["data"]["data"]["payments"]["stripeAccountId"], account_id);

    // A second connect reuses the recorded account.
    assert_eq!(connect_payments(&state, seller).await, account_id);
}

#[tokio::test]
async fn completed_session_records_the_connected_account() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;
    drive_to_payments(&state, seller, session).await;

    let (status, json) = complete(&state, session).await;
    assert_eq!(status, StatusCode::OK);
    let account_id = json["data"]["data"]["payments"]["stripeAccountId"].clone();
    assert!(account_id.is_string());

    let json = body_json(
        get(build_test_app(state.clone()), &format!("/api/sellers/{seller}")).await,
    )
    .await;
    assert_eq!(json["data"]["stripeAccountId"], account_id);
    assert_eq!(json["data"]["status"], "pending_verification");
}

#[tokio::test]
async fn second_complete_leaves_the_first_result_alone() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;
    drive_to_payments(&state, seller, session).await;

    assert_eq!(complete(&state, session).await.0, StatusCode::OK);
    let (status, _) = complete(&state, session).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let json = get_session(&state, session).await;
    assert_eq!(json["data"]["status"], "completed");
    assert!(json["data"]["lastError"].is_null());
    assert_eq!(seller_status(&state, seller).await, "pending_verification");
}

#[tokio::test]
async fn save_from_a_stale_read_is_a_conflict() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;
    drive_to_payments(&state, seller, session).await;

    // A slow request read the session before completion landed.
    let Some(mut stale) = state.store.find_session(session).await.unwrap() else {
        panic!("session {session} not stored");
    };
    assert_eq!(complete(&state, session).await.0, StatusCode::OK);

    stale.session.abandon().unwrap();
    let Err(err) = state.store.save_session(&stale).await else {
        panic!("stale save was accepted");
    };
    assert_eq!(err.into_response().status(), StatusCode::CONFLICT);

    assert_eq!(get_session(&state, session).await["data"]["status"], "completed");
    assert_eq!(seller_status(&state, seller).await, "pending_verification");
}

#[tokio::test]
async fn completion_releases_previews() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;
    drive_to_payments(&state, seller, session).await;

    let json = get_session(&state, session).await;
    let preview = json["data"]["data"]["visual"]["logo"]["previewUrl"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(state.previews.len().await > 0);

    assert_eq!(complete(&state, session).await.0, StatusCode::OK);
    assert_eq!(state.previews.len().await, 0);

    let response = get(build_test_app(state.clone()), &preview).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = get_session(&state, session).await;
    assert!(json["data"]["data"]["visual"]["logo"]["previewUrl"].is_null());
    assert!(json["data"]["data"]["visual"]["logo"]["name"].is_string());
}

#[tokio::test]
async fn session_after_verification_starts_from_previous_answers() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let first = start_session(&state, seller).await;
    drive_to_payments(&state, seller, first).await;
    assert_eq!(complete(&state, first).await.0, StatusCode::OK);

    // Verification sends the seller back to fix something.
    state
        .store
        .update_seller_status(seller, SellerStatus::OnboardingInProgress)
        .await
        .unwrap();

    let response = post_json(
        build_test_app(state.clone()),
        "/api/onboarding-sessions",
        json!({ "sellerId": seller }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    let second = &json["data"];
    assert_ne!(second["id"], first);
    assert_eq!(second["currentStep"], "location");
    assert_eq!(second["status"], "in_progress");
    assert_eq!(second["isValid"], true);
    assert_eq!(second["data"]["location"]["city"], "Aranjuez");
    assert_eq!(second["data"]["story"]["businessName"], "Huerta del Jarama");
    assert_eq!(second["data"]["payments"]["stripeConnected"], true);
    assert!(second["data"]["visual"]["logo"]["previewUrl"].is_null());
}

#[tokio::test]
async fn abandon_closes_the_session() {
    let state = test_state();
    let seller = approved_seller(&state, "lucia@huerta.es").await;
    let session = start_session(&state, seller).await;

    let response = post(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/abandon"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "abandoned");

    let response = put_json(
        build_test_app(state.clone()),
        &format!("/api/onboarding-sessions/{session}/step-data"),
        location(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The seller can start over with a fresh session.
    let fresh = start_session(&state, seller).await;
    assert_ne!(fresh, session);
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

#[tokio::test]
async fn catalog_tables_are_served() {
    let state = test_state();
    for (path, expected) in [
        ("categories", 12),
        ("provinces", 52),
        ("values", 8),
        ("shipping-methods", 4),
        ("steps", 6),
    ] {
        let response = get(build_test_app(state.clone()), &format!("/api/catalog/{path}")).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), expected, "{path}");
    }
}
