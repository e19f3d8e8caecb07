//! 测试辅助工具

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use news_desk_shared::Timestamp;
use serde_json::{Value, json};

use crate::client::{Client, Navigator};
use crate::config::ClientConfig;
use crate::session::{SessionContext, session_from_token};
use crate::web::{MemoryStorage, MockTransport};

pub const BASE: &str = "http://api.test/api";

/// 2100-01-01，测试期间不会过期
pub const FUTURE_EXP: i64 = 4_102_444_800;

/// 生成未签名的 JWT 形式令牌
pub fn make_token(claims: Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

pub fn token_for(id: i64, username: &str, role: &str, agency_id: Option<i64>) -> String {
    let mut claims = json!({ "id": id, "username": username, "role": role, "exp": FUTURE_EXP });
    if let Some(agency_id) = agency_id {
        claims["agencyId"] = json!(agency_id);
    }
    make_token(claims)
}

#[derive(Default)]
pub struct RecordingNavigator {
    count: AtomicUsize,
}

impl RecordingNavigator {
    pub fn redirects(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl Navigator for RecordingNavigator {
    fn force_login(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// 已登录为 Author alice (id 1, agency 5) 的会话
pub fn signed_in_session() -> (SessionContext, String) {
    let token = token_for(1, "alice", "Author", Some(5));
    let session = SessionContext::new(MemoryStorage::new(), "token");
    if let Ok(s) = session_from_token(&token, Timestamp::now()) {
        session.establish(s);
    }
    (session, token)
}

pub fn test_config() -> ClientConfig {
    ClientConfig {
        api_base_url: BASE.to_string(),
        ..ClientConfig::default()
    }
}

pub fn client_with(session: SessionContext) -> (Client<MockTransport>, Arc<RecordingNavigator>) {
    let navigator = Arc::new(RecordingNavigator::default());
    let client = Client::new(&test_config(), MockTransport::new(), session, navigator.clone());
    (client, navigator)
}

pub fn anonymous_client() -> (Client<MockTransport>, Arc<RecordingNavigator>) {
    client_with(SessionContext::new(MemoryStorage::new(), "token"))
}

pub fn signed_in_client() -> (Client<MockTransport>, Arc<RecordingNavigator>) {
    client_with(signed_in_session().0)
}

pub fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

pub fn news_json(id: i64, title: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "content": format!("{title} body"),
        "createdAt": "2024-03-01T10:00:00Z",
        "updatedAt": "2024-03-01T10:00:00Z",
        "publishedAt": "2024-03-02T10:00:00Z",
        "authorId": 1,
        "agencyId": 5,
        "categoryId": 3
    })
}

pub fn news(id: i64, title: &str) -> news_desk_shared::News {
    serde_json::from_value(news_json(id, title)).unwrap()
}
