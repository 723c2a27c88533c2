#![allow(dead_code, clippy::unwrap_used)]

use base64ct::{Base64UrlUnpadded, Encoding};
use rbac_console::{
    app_lib::{config::ConfigOverrides, ApiClient, AppConfig, Notice, NoticeLevel, Notifier},
    features::auth::storage::{MemoryTokenStorage, TokenStorage},
};
use secrecy::SecretString;
use serde_json::{json, Value};
use std::{
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};
use wiremock::MockServer;

/// Collects notices so tests can assert on them.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self, level: NoticeLevel) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|notice| notice.level == level)
            .map(|notice| notice.message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

pub struct Harness {
    pub server: MockServer,
    pub api: ApiClient,
    pub storage: Arc<MemoryTokenStorage>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let storage = Arc::new(MemoryTokenStorage::new());
        let notifier = Arc::new(RecordingNotifier::default());
        let api = client_for(&server, storage.clone(), notifier.clone());
        Self {
            server,
            api,
            storage,
            notifier,
        }
    }

    pub fn store_tokens(&self, access: &str, refresh: &str) {
        self.storage
            .set_access_token(&SecretString::from(access.to_string()))
            .unwrap();
        self.storage
            .set_refresh_token(&SecretString::from(refresh.to_string()))
            .unwrap();
    }
}

pub fn client_for(
    server: &MockServer,
    storage: Arc<MemoryTokenStorage>,
    notifier: Arc<RecordingNotifier>,
) -> ApiClient {
    let config = AppConfig::load(ConfigOverrides {
        api_base_url: Some(server.uri()),
        ephemeral: true,
        ..ConfigOverrides::default()
    });
    ApiClient::new(config, storage, notifier).unwrap()
}

/// Successful backend envelope around `data`.
pub fn ok(data: Value) -> Value {
    json!({
        "success": true,
        "code": 200,
        "message": "Operation succeeded",
        "data": data,
        "timestamp": "2025-12-06T16:00:00Z"
    })
}

/// Failed backend envelope.
pub fn failed(code: &str, message: &str) -> Value {
    json!({
        "success": false,
        "code": code,
        "message": message,
        "data": null,
        "errors": null,
        "request_id": "req-1",
        "timestamp": "2025-12-06T16:00:00Z"
    })
}

pub fn page(results: Value, count: u64) -> Value {
    json!({
        "results": results,
        "count": count,
        "page": 1,
        "page_size": 10,
        "pages": 1
    })
}

pub fn user(id: u64, username: &str, permissions: &[&str], roles: &[&str]) -> Value {
    json!({
        "id": id,
        "username": username,
        "email": format!("{username}@example.com"),
        "is_active": true,
        "is_staff": false,
        "date_joined": "2025-12-06T16:00:00Z",
        "profile": {
            "id": id,
            "user": id,
            "avatar": null,
            "phone": null,
            "gender": 1,
            "birthday": "1990-05-01",
            "department": 3,
            "position": "Engineer",
            "employee_no": format!("E{id:04}"),
            "join_date": "2024-03-01"
        },
        "permissions": permissions,
        "roles": roles
    })
}

/// Unsigned JWT whose `exp` is `offset_secs` from now.
pub fn jwt(offset_secs: i64) -> String {
    let now = i64::try_from(
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs(),
    )
    .unwrap();
    let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = json!({"token_type": "access", "exp": now + offset_secs, "user_id": 1});
    let body = Base64UrlUnpadded::encode_string(payload.to_string().as_bytes());
    format!("{header}.{body}.sig")
}
