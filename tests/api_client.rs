#![allow(clippy::unwrap_used)]

mod common;

use common::{failed, ok, Harness, RecordingNotifier};
use rbac_console::{
    app_lib::{config::ConfigOverrides, ApiClient, AppConfig, AppError, NoticeLevel},
    features::{
        auth::storage::{MemoryTokenStorage, TokenStorage},
        i18n,
        users::client as users,
    },
};
use serde_json::{json, Value};
use std::{sync::Arc, time::Duration};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

#[tokio::test]
async fn sends_bearer_token_and_language() {
    let harness = Harness::start().await;
    harness.store_tokens("access-1", "refresh-1");
    i18n::set_language(harness.storage.as_ref(), "en").unwrap();

    Mock::given(method("GET"))
        .and(path("/users/me/"))
        .and(header("authorization", "Bearer access-1"))
        .and(header("x-language", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(common::user(
            1,
            "admin",
            &["user:read"],
            &["admin"],
        ))))
        .expect(1)
        .mount(&harness.server)
        .await;

    let me = users::current_user(&harness.api).await.unwrap();
    assert_eq!(me.user.username, "admin");
    assert_eq!(me.roles, Some(vec!["admin".to_string()]));
}

#[tokio::test]
async fn default_language_without_token() {
    let harness = Harness::start().await;

    Mock::given(method("GET"))
        .and(path("/permissions/tree/"))
        .and(header("x-language", "zh-CN"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(json!([]))))
        .expect(1)
        .mount(&harness.server)
        .await;

    let value: Value = harness.api.get("/permissions/tree/").await.unwrap();
    assert_eq!(value, json!([]));
    let requests = harness.server.received_requests().await.unwrap();
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn unauthorized_drops_access_token_and_notifies() {
    let harness = Harness::start().await;
    harness.store_tokens("stale", "refresh-1");

    Mock::given(method("GET"))
        .and(path("/users/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
        .mount(&harness.server)
        .await;

    let err = harness.api.get::<Value>("/users/").await.unwrap_err();
    assert!(matches!(err, AppError::SessionExpired));
    assert!(harness.storage.access_token().is_none());
    assert!(harness.storage.refresh_token().is_some());
    assert_eq!(
        harness.notifier.messages(NoticeLevel::Error),
        vec!["Session expired, please sign in again".to_string()]
    );
}

#[tokio::test]
async fn login_rejection_keeps_session_and_reports_backend_message() {
    let harness = Harness::start().await;
    harness.store_tokens("still-valid", "refresh-1");

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(failed("E001001", "Invalid credentials")),
        )
        .mount(&harness.server)
        .await;

    let err = harness
        .api
        .post::<_, Value>("/auth/login/", &json!({"username": "x", "password": "y"}))
        .await
        .unwrap_err();
    match err {
        AppError::Unauthorized(failure) => assert_eq!(failure.message, "Invalid credentials"),
        other => panic!("unexpected error {other:?}"),
    }
    assert!(harness.storage.access_token().is_some());
    assert!(harness.notifier.notices().is_empty());
}

#[tokio::test]
async fn status_errors_raise_notices() {
    let harness = Harness::start().await;

    for (status, route) in [(403, "/roles/"), (404, "/roles/9/"), (500, "/departments/")] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(status))
            .mount(&harness.server)
            .await;
    }

    let forbidden = harness.api.get::<Value>("/roles/").await.unwrap_err();
    let missing = harness.api.get::<Value>("/roles/9/").await.unwrap_err();
    let broken = harness.api.get::<Value>("/departments/").await.unwrap_err();

    assert_eq!(forbidden.status(), Some(403));
    assert_eq!(missing.status(), Some(404));
    assert_eq!(broken.status(), Some(500));
    assert_eq!(
        harness.notifier.messages(NoticeLevel::Error),
        vec![
            "You do not have permission to access this resource".to_string(),
            "The requested resource does not exist".to_string(),
            "Internal server error".to_string(),
        ]
    );
}

#[tokio::test]
async fn other_statuses_use_the_body_message() {
    let harness = Harness::start().await;

    Mock::given(method("POST"))
        .and(path("/roles/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(failed("E002001", "Code taken")))
        .mount(&harness.server)
        .await;

    let err = harness
        .api
        .post::<_, Value>("/roles/", &json!({"name": "a", "code": "a"}))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Http { status: 400, ref message } if message == "Code taken"));
    assert_eq!(
        harness.notifier.messages(NoticeLevel::Error),
        vec!["Code taken".to_string()]
    );
}

#[tokio::test]
async fn failed_envelope_on_success_status_is_a_business_error() {
    let harness = Harness::start().await;

    Mock::given(method("DELETE"))
        .and(path("/roles/1/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(failed("E003002", "System roles are locked")),
        )
        .mount(&harness.server)
        .await;

    let err = harness.api.delete("/roles/1/").await.unwrap_err();
    let failure = err.failure().unwrap();
    assert_eq!(failure.message, "System roles are locked");
    assert_eq!(failure.request_id.as_deref(), Some("req-1"));
    assert!(harness.notifier.notices().is_empty());
}

#[tokio::test]
async fn bare_payloads_and_empty_bodies_pass_through() {
    let harness = Harness::start().await;

    Mock::given(method("GET"))
        .and(path("/auth/captcha/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"image": "data:", "key": "k1"})),
        )
        .mount(&harness.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/users/4/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&harness.server)
        .await;

    let captcha: Value = harness.api.get("/auth/captcha/").await.unwrap();
    assert_eq!(captcha["key"], "k1");
    harness.api.delete("/users/4/").await.unwrap();
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let harness = Harness::start().await;
    let uri = harness.server.uri();
    let api = harness.api.clone();
    drop(harness.server);

    let err = api.get::<Value>("/users/").await.unwrap_err();
    assert!(
        matches!(err, AppError::Network(_) | AppError::Timeout(_)),
        "{uri}: {err:?}"
    );
    assert_eq!(
        harness.notifier.messages(NoticeLevel::Error),
        vec!["Network error, check your connection".to_string()]
    );
}

#[tokio::test]
async fn slow_server_times_out_with_a_network_notice() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok(json!([])))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let notifier = Arc::new(RecordingNotifier::default());
    let config = AppConfig::load(ConfigOverrides {
        api_base_url: Some(server.uri()),
        timeout_secs: Some(1),
        ephemeral: true,
        ..ConfigOverrides::default()
    });
    assert_eq!(config.timeout, Duration::from_secs(1));
    let api = ApiClient::new(
        config,
        Arc::new(MemoryTokenStorage::new()),
        notifier.clone(),
    )
    .unwrap();

    let err = api.get::<Value>("/users/").await.unwrap_err();
    assert!(matches!(err, AppError::Timeout(_)), "{err:?}");
    assert_eq!(
        notifier.messages(NoticeLevel::Error),
        vec!["Network error, check your connection".to_string()]
    );
}

#[tokio::test]
async fn delete_accepts_query_parameters() {
    let harness = Harness::start().await;

    Mock::given(method("DELETE"))
        .and(path("/departments/8/"))
        .and(wiremock::matchers::query_param("cascade", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok(Value::Null)))
        .expect(1)
        .mount(&harness.server)
        .await;

    harness
        .api
        .delete_with_query("/departments/8/", &[("cascade", "true")])
        .await
        .unwrap();
}
