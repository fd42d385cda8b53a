#![allow(clippy::unwrap_used)]
// Integration tests for the access-request and task-polling workflows,
// driven against a wiremock appliance.

use std::time::Duration;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pamly_api::ApplianceClient;
use pamly_core::models::{
    AccessRequest, AccessRequestState, AccountEntitlement, PasswordActivityLog,
};
use pamly_core::{
    AuthCredentials, CoreError, Deadline, PollConfig, RequestOptions, Session, SessionConfig,
};

const TASK_ID: &str = "3f8e2a8c-1d4b-4c55-9a3e-6f0b7c2d9e11";

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Session) {
    setup_with_interval(Duration::from_millis(20)).await
}

async fn setup_with_interval(interval: Duration) -> (MockServer, Session) {
    let server = MockServer::start().await;
    let client = ApplianceClient::with_client(
        reqwest::Client::new(),
        Url::parse(&server.uri()).unwrap(),
    )
    .with_token(SecretString::from("user-token"));
    let poll = PollConfig {
        checkout_interval: interval,
        task_interval: interval,
    };
    (server, Session::from_client(client, poll))
}

fn api_path(suffix: &str) -> String {
    format!("/service/core/v4/{suffix}")
}

fn request(id: &str, state: &str) -> AccessRequest {
    serde_json::from_value(json!({ "Id": id, "State": state, "AccountId": 5, "AssetId": 2 }))
        .unwrap()
}

fn request_json(id: &str, state: &str) -> Value {
    json!({ "Id": id, "State": state, "AccountId": 5, "AssetId": 2 })
}

fn activity_log(name: &str) -> PasswordActivityLog {
    serde_json::from_value(json!({
        "Id": TASK_ID,
        "LogTime": "2024-05-01T08:00:00Z",
        "AccountId": 5,
        "Name": name
    }))
    .unwrap()
}

fn generous() -> Deadline {
    Deadline::after(Duration::from_secs(5))
}

async fn request_count(server: &MockServer, verb: &str, suffix: &str) -> usize {
    let wanted = api_path(suffix);
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == wanted)
        .count()
}

// ── Session setup ───────────────────────────────────────────────────

#[tokio::test]
async fn test_connect_with_password_logs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/RSTS/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"access_token": "sts"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("Token/LoginResponse")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"Status": "Success", "UserToken": "user-token"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("Token/Logout")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let config = SessionConfig::new(
        Url::parse(&server.uri()).unwrap(),
        AuthCredentials::Password {
            username: "ada".into(),
            password: SecretString::from("pw"),
            provider: "local".into(),
        },
    );
    let session = Session::connect(config).await.unwrap();
    assert!(session.owns_login());
    assert!(session.client().has_token());

    session.disconnect().await.unwrap();
    assert!(!session.client().has_token());
}

#[tokio::test]
async fn test_connect_with_token_makes_no_request() {
    let server = MockServer::start().await;
    let config = SessionConfig::new(
        Url::parse(&server.uri()).unwrap(),
        AuthCredentials::Token(SecretString::from("issued-elsewhere")),
    );
    let session = Session::connect(config).await.unwrap();
    assert!(!session.owns_login());
    assert!(session.client().has_token());
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Close dispatch ──────────────────────────────────────────────────

#[tokio::test]
async fn test_close_complete_returns_request_unchanged() {
    let (server, session) = setup().await;
    let complete = request("r-1", "Complete");

    let closed = session.close_access_request(&complete).await.unwrap();
    assert_eq!(closed, complete);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_close_checked_out_checks_in_once() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("AccessRequests/r-1/CheckIn")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(request_json("r-1", "PasswordCheckedIn")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let closed = session
        .close_access_request(&request("r-1", "PasswordCheckedOut"))
        .await
        .unwrap();
    assert_eq!(closed.state, AccessRequestState::PasswordCheckedIn);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_close_cancels_available_and_pending() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("AccessRequests/r-2/Cancel")))
        .respond_with(ResponseTemplate::new(200).set_body_json(request_json("r-2", "Canceled")))
        .expect(3)
        .mount(&server)
        .await;

    for state in ["Pending", "RequestAvailable", "PendingAccountRestored"] {
        let closed = session
            .close_access_request(&request("r-2", state))
            .await
            .unwrap();
        assert_eq!(closed.state, AccessRequestState::Canceled);
    }
}

#[tokio::test]
async fn test_close_denied_is_rejected_locally() {
    let (server, session) = setup().await;

    let err = session
        .close_access_request(&request("r-3", "Denied"))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::InvalidState { .. }));
    assert!(err.to_string().contains("Denied"), "{err}");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_close_rejects_pending_approval() {
    let (server, session) = setup().await;

    let err = session
        .close_access_request(&request("r-4", "PendingApproval"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("PendingApproval"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Checkout ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_checkout_available_request() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("AccessRequests/r-1/CheckOutPassword")))
        .respond_with(ResponseTemplate::new(200).set_body_string("Tr0ub4dor&3"))
        .expect(1)
        .mount(&server)
        .await;

    let password = session
        .check_out_password(&request("r-1", "RequestAvailable"), false, &generous())
        .await
        .unwrap();
    assert_eq!(password.expose_secret(), "Tr0ub4dor&3");
}

#[tokio::test]
async fn test_checkout_pending_without_wait_fails_immediately() {
    let (server, session) = setup().await;

    let err = session
        .check_out_password(&request("r-1", "Pending"), false, &generous())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::StillPending {
            state: AccessRequestState::Pending,
            ..
        }
    ));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_invalid_state_fails_immediately() {
    let (server, session) = setup().await;

    let err = session
        .check_out_password(&request("r-1", "Expired"), true, &generous())
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Expired"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_checkout_waits_until_available() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/r-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(request_json("r-1", "Pending")))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/r-1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(request_json("r-1", "RequestAvailable")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("AccessRequests/r-1/CheckOutPassword")))
        .respond_with(ResponseTemplate::new(200).set_body_string("hunter2"))
        .expect(1)
        .mount(&server)
        .await;

    let password = session
        .check_out_password(&request("r-1", "Pending"), true, &generous())
        .await
        .unwrap();
    assert_eq!(password.expose_secret(), "hunter2");
    assert_eq!(request_count(&server, "GET", "AccessRequests/r-1").await, 3);
}

#[tokio::test]
async fn test_checkout_wait_times_out() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/r-1")))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(request_json("r-1", "PendingApproval")),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(api_path("AccessRequests/r-1/CheckOutPassword")))
        .respond_with(ResponseTemplate::new(200).set_body_string("never"))
        .expect(0)
        .mount(&server)
        .await;

    let deadline = Deadline::after(Duration::from_millis(150));
    let err = session
        .check_out_password(&request("r-1", "PendingApproval"), true, &deadline)
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn test_checkout_wait_stops_on_cancellation() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/r-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(request_json("r-1", "Pending")))
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let deadline = Deadline::from_token(token.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(80)).await;
        token.cancel();
    });

    let err = session
        .check_out_password(&request("r-1", "Pending"), true, &deadline)
        .await
        .unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_checkout_wait_fails_fast_on_denial() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/r-1")))
        .respond_with(ResponseTemplate::new(200).set_body_json(request_json("r-1", "Denied")))
        .mount(&server)
        .await;

    let err = session
        .check_out_password(&request("r-1", "PendingApproval"), true, &generous())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::InvalidState {
            state: AccessRequestState::Denied,
            ..
        }
    ));
    assert_eq!(request_count(&server, "GET", "AccessRequests/r-1").await, 1);
}

// ── Batch create ────────────────────────────────────────────────────

fn entitlement(account_id: i64) -> AccountEntitlement {
    serde_json::from_value(json!({
        "Account": { "Id": account_id, "Name": format!("acct{account_id}"), "AssetId": 2 },
        "Asset": { "Id": 2, "Name": "db01" },
        "Policies": [{ "Id": 1, "AccessRequestProperties": { "AccessRequestType": "Password" } }]
    }))
    .unwrap()
}

#[tokio::test]
async fn test_batch_partial_failure_keeps_every_entry() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("AccessRequests/BatchCreate")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "Response": request_json("r-1", "PendingApproval"),
                "StatusCode": "Created", "StatusCodeNumber": 201, "IsSuccess": true
            },
            {
                "Response": null,
                "StatusCode": "BadRequest", "StatusCodeNumber": 400, "IsSuccess": false,
                "Error": { "Code": 60108, "Message": "Account 6 is not requestable" }
            },
            {
                "Response": request_json("r-3", "RequestAvailable"),
                "StatusCode": "Created", "StatusCodeNumber": 201, "IsSuccess": true
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let entitlements = [entitlement(5), entitlement(6), entitlement(7)];
    let err = session
        .create_access_requests(&entitlements, &RequestOptions::default())
        .await
        .unwrap_err();

    let CoreError::PartialBatch { results, message } = err else {
        panic!("expected PartialBatch, got {err:?}");
    };
    assert_eq!(results.len(), 3);
    assert!(message.contains("Account 6 is not requestable"), "{message}");
    assert_eq!(results[0].response.as_ref().unwrap().id, "r-1");
    assert_eq!(results[2].response.as_ref().unwrap().id, "r-3");
    assert_eq!(
        results[2].response.as_ref().unwrap().state,
        AccessRequestState::RequestAvailable
    );
}

#[tokio::test]
async fn test_batch_combines_every_failure() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("AccessRequests/BatchCreate")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "IsSuccess": false, "Error": { "Message": "first problem" } },
            { "IsSuccess": false, "Error": { "Message": "second problem" } }
        ])))
        .mount(&server)
        .await;

    let err = session
        .create_access_requests(&[entitlement(5), entitlement(6)], &RequestOptions::default())
        .await
        .unwrap_err();
    let text = err.to_string();
    assert!(text.contains("first problem") && text.contains("second problem"), "{text}");
}

#[tokio::test]
async fn test_batch_success() {
    let (server, session) = setup().await;

    Mock::given(method("POST"))
        .and(path(api_path("AccessRequests/BatchCreate")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "Response": request_json("r-1", "PendingApproval"), "IsSuccess": true }
        ])))
        .mount(&server)
        .await;

    let options = RequestOptions {
        requested_duration_minutes: Some(60),
        ..RequestOptions::default()
    };
    let results = session
        .create_access_requests(&[entitlement(5)], &options)
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert!(results[0].is_success);

    let sent: Value = serde_json::from_slice(&server.received_requests().await.unwrap()[0].body)
        .unwrap();
    assert_eq!(
        sent,
        json!([{
            "AccessRequestType": "Password",
            "AccountId": 5,
            "AssetId": 2,
            "RequestedDurationMinutes": 60
        }])
    );
}

// ── Task polling ────────────────────────────────────────────────────

fn task_filter(field: &str) -> String {
    format!("AccountId eq 5 and {field} ieq '{TASK_ID}'")
}

#[tokio::test]
async fn test_change_password_success() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .and(query_param("filter", task_filter("LastPasswordChangeTaskId")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "AccountId": 5,
            "LastPasswordChangeTaskId": TASK_ID,
            "LastSuccessPasswordChangeDate": "2024-05-01T08:00:01Z",
            "LastFailurePasswordChangeDate": "0001-01-01T00:00:00Z"
        }])))
        .mount(&server)
        .await;

    let done = session
        .check_task_state(&activity_log("ChangePassword"), &generous())
        .await
        .unwrap();
    assert!(done);
}

#[tokio::test]
async fn test_change_password_failure() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "AccountId": 5,
            "LastPasswordChangeTaskId": TASK_ID,
            "LastSuccessPasswordChangeDate": "2024-04-01T00:00:00Z",
            "LastFailurePasswordChangeDate": "2024-05-01T08:00:01Z",
            "FailedPasswordChangeAttempts": 1
        }])))
        .mount(&server)
        .await;

    let done = session
        .check_task_state(&activity_log("ChangePassword"), &generous())
        .await
        .unwrap();
    assert!(!done);
}

#[tokio::test]
async fn test_check_api_key_uses_counter() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "AccountId": 5,
            "LastApiKeyCheckTaskId": TASK_ID,
            "FailedApiKeyCheckAttempts": 0
        }])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "AccountId": 5,
            "LastApiKeyCheckTaskId": TASK_ID,
            "FailedApiKeyCheckAttempts": 3
        }])))
        .mount(&server)
        .await;

    let log = activity_log("CheckApiKey");
    assert!(session.check_task_state(&log, &generous()).await.unwrap());
    assert!(!session.check_task_state(&log, &generous()).await.unwrap());
    assert_eq!(request_count(&server, "GET", "AccountTaskSchedules").await, 2);
}

#[tokio::test]
async fn test_task_record_not_visible_yet_is_retried() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .up_to_n_times(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "AccountId": 5,
            "LastPasswordCheckTaskId": TASK_ID,
            "LastSuccessPasswordCheckDate": "2024-05-01T08:00:00Z"
        }])))
        .mount(&server)
        .await;

    let done = session
        .check_task_state(&activity_log("CheckPassword"), &generous())
        .await
        .unwrap();
    assert!(done);
    assert_eq!(request_count(&server, "GET", "AccountTaskSchedules").await, 3);
}

#[tokio::test]
async fn test_task_times_out() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "AccountId": 5,
            "LastPasswordChangeTaskId": TASK_ID,
            "LastSuccessPasswordChangeDate": "2024-04-30T00:00:00Z"
        }])))
        .mount(&server)
        .await;

    let err = session
        .check_task_state(
            &activity_log("ChangePassword"),
            &Deadline::after(Duration::from_millis(120)),
        )
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
}

#[tokio::test]
async fn test_unmapped_task_is_rejected_without_polling() {
    let (server, session) = setup().await;

    let err = session
        .check_task_state(&activity_log("RotateCertificate"), &generous())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedTask { .. }));

    let err = session
        .check_task_state(&activity_log("EnableAccount"), &generous())
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedTask { .. }));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_task_id_is_rejected() {
    let (server, session) = setup().await;

    let mut log = activity_log("ChangePassword");
    log.id = "not-a-uuid".into();
    let err = session.check_task_state(&log, &generous()).await.unwrap_err();
    assert!(matches!(err, CoreError::InvalidTaskId { ref id } if id == "not-a-uuid"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_task_id_is_sent_verbatim_and_matched_case_insensitively() {
    let (server, session) = setup().await;
    let upper = TASK_ID.to_uppercase();

    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .and(query_param(
            "filter",
            format!("AccountId eq 5 and LastPasswordChangeTaskId ieq '{upper}'"),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "AccountId": 5,
            "LastPasswordChangeTaskId": TASK_ID,
            "LastSuccessPasswordChangeDate": "2024-05-01T08:00:03Z"
        }])))
        .expect(1)
        .mount(&server)
        .await;

    let mut log = activity_log("ChangePassword");
    log.id.clone_from(&upper);
    let done = session.check_task_state(&log, &generous()).await.unwrap();
    assert!(done);
}

// ── Slow appliance ──────────────────────────────────────────────────

#[tokio::test]
async fn test_checkout_wait_does_not_outlive_deadline_during_slow_poll() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/r-1")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(request_json("r-1", "Available"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let err = session
        .check_out_password(
            &request("r-1", "PendingApproval"),
            true,
            &Deadline::after(Duration::from_millis(200)),
        )
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(
        started.elapsed() < Duration::from_secs(1),
        "wait overran its deadline: {:?}",
        started.elapsed()
    );
}

#[tokio::test]
async fn test_checkout_wait_cancellation_interrupts_slow_poll() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/r-1")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(request_json("r-1", "Pending"))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let token = CancellationToken::new();
    let deadline = Deadline::from_token(token.clone());
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    let started = std::time::Instant::now();
    let err = session
        .check_out_password(&request("r-1", "Pending"), true, &deadline)
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_task_wait_does_not_outlive_deadline_during_slow_poll() {
    let (server, session) = setup().await;

    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let started = std::time::Instant::now();
    let err = session
        .check_task_state(
            &activity_log("ChangePassword"),
            &Deadline::after(Duration::from_millis(200)),
        )
        .await
        .unwrap_err();
    assert!(err.is_timeout(), "expected timeout, got {err:?}");
    assert!(started.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_checkout_wait_pauses_between_slow_polls() {
    // Each GET takes 300ms and the interval is 200ms. Polls start at
    // roughly 200ms and 700ms; a third would need to start by 1200ms.
    let (server, session) = setup_with_interval(Duration::from_millis(200)).await;

    Mock::given(method("GET"))
        .and(path(api_path("AccessRequests/r-1")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(request_json("r-1", "PendingApproval"))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let err = session
        .check_out_password(
            &request("r-1", "PendingApproval"),
            true,
            &Deadline::after(Duration::from_millis(1150)),
        )
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    let polls = request_count(&server, "GET", "AccessRequests/r-1").await;
    assert!(polls <= 2, "polls ran back to back: {polls} requests");
}

#[tokio::test]
async fn test_task_wait_pauses_between_slow_polls() {
    let (server, session) = setup_with_interval(Duration::from_millis(200)).await;

    Mock::given(method("GET"))
        .and(path(api_path("AccountTaskSchedules")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    // Polls start at 0ms, ~500ms and ~1000ms when each one waits a full
    // interval after the previous response.
    let err = session
        .check_task_state(
            &activity_log("ChangePassword"),
            &Deadline::after(Duration::from_millis(1150)),
        )
        .await
        .unwrap_err();
    assert!(err.is_timeout());
    let polls = request_count(&server, "GET", "AccountTaskSchedules").await;
    assert!(polls <= 3, "polls ran back to back: {polls} requests");
}
