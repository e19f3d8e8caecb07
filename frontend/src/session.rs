//! 会话模块
//!
//! 会话完全由访问令牌推导：令牌保存在注入的 `KeyValueStorage` 中，
//! 当前用户来自令牌载荷中的声明，客户端不校验签名。
//!
//! `SessionContext` 在构造时注入 HTTP 层，取代全局读取 LocalStorage。

use std::sync::{Arc, PoisonError, RwLock};

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use news_desk_shared::{Timestamp, TokenClaims, User};

use crate::error::TokenError;
use crate::web::KeyValueStorage;

/// JWT 载荷使用 base64url，是否带填充都接受
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 已认证会话
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// 解码令牌载荷中的声明（不校验签名）
pub fn decode_claims(token: &str) -> Result<TokenClaims, TokenError> {
    let payload = token
        .split('.')
        .nth(1)
        .filter(|segment| !segment.is_empty())
        .ok_or(TokenError::Malformed)?;

    let bytes = PAYLOAD_ENGINE
        .decode(payload.trim_end_matches('='))
        .map_err(|e| TokenError::Encoding(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| TokenError::Claims(e.to_string()))
}

/// 由令牌推导会话，过期令牌视为无效
pub fn session_from_token(token: &str, now: Timestamp) -> Result<Session, TokenError> {
    let claims = decode_claims(token)?;
    if claims.is_expired(now) {
        return Err(TokenError::Expired);
    }
    Ok(Session {
        token: token.to_string(),
        user: claims.to_user(),
    })
}

struct SessionInner {
    storage: Box<dyn KeyValueStorage>,
    storage_key: String,
    current: RwLock<Option<Session>>,
}

/// 会话上下文
///
/// 可廉价克隆的句柄，HTTP 层从这里读取令牌，登录/注销/401 通过这里写入。
#[derive(Clone)]
pub struct SessionContext {
    inner: Arc<SessionInner>,
}

impl SessionContext {
    pub fn new(storage: impl KeyValueStorage + 'static, storage_key: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                storage: Box::new(storage),
                storage_key: storage_key.into(),
                current: RwLock::new(None),
            }),
        }
    }

    /// 从存储恢复会话
    ///
    /// 无令牌返回 `None`；令牌无法解码或已过期时清除存储并返回 `None`。
    /// 重复调用结果一致。
    pub fn restore(&self, now: Timestamp) -> Option<Session> {
        let Some(token) = self.inner.storage.get(&self.inner.storage_key) else {
            self.set_current(None);
            return None;
        };

        match session_from_token(&token, now) {
            Ok(session) => {
                tracing::info!(user_id = session.user.id, role = %session.user.role, "session restored");
                self.set_current(Some(session.clone()));
                Some(session)
            }
            Err(e) => {
                tracing::info!(reason = %e, "discarding stored token");
                self.clear();
                None
            }
        }
    }

    /// 建立会话并持久化令牌
    pub fn establish(&self, session: Session) {
        if !self.inner.storage.set(&self.inner.storage_key, &session.token) {
            tracing::warn!("token could not be persisted; session lasts until reload");
        }
        self.set_current(Some(session));
    }

    /// 清除会话与持久化令牌
    pub fn clear(&self) {
        self.inner.storage.remove(&self.inner.storage_key);
        self.set_current(None);
    }

    pub fn current(&self) -> Option<Session> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<User> {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// 持久化存储中的原始令牌
    pub fn stored_token(&self) -> Option<String> {
        self.inner.storage.get(&self.inner.storage_key)
    }

    fn set_current(&self, session: Option<Session>) {
        *self
            .inner
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner) = session;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FUTURE_EXP, make_token};
    use crate::web::MemoryStorage;
    use news_desk_shared::Role;
    use serde_json::json;

    fn now() -> Timestamp {
        Timestamp::from_secs(1_700_000_000)
    }

    fn alice_claims(exp: i64) -> serde_json::Value {
        json!({ "id": 1, "username": "alice", "role": "Author", "agencyId": 5, "exp": exp })
    }

    #[test]
    fn decodes_claims_without_padding() {
        let token = make_token(alice_claims(FUTURE_EXP));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.username, "alice");
        assert_eq!(claims.role, Role::Author);
        assert_eq!(claims.agency_id, Some(5));
    }

    #[test]
    fn rejects_tokens_without_payload() {
        assert_eq!(decode_claims("garbage"), Err(TokenError::Malformed));
        assert_eq!(decode_claims("a..c"), Err(TokenError::Malformed));
        assert!(matches!(decode_claims("a.%%%.c"), Err(TokenError::Encoding(_))));
    }

    #[test]
    fn rejects_unknown_role() {
        let token = make_token(json!({ "id": 1, "username": "x", "role": "Editor", "exp": FUTURE_EXP }));
        assert!(matches!(decode_claims(&token), Err(TokenError::Claims(_))));
    }

    #[test]
    fn restore_without_token_is_absent() {
        let ctx = SessionContext::new(MemoryStorage::new(), "token");
        assert_eq!(ctx.restore(now()), None);
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn restore_valid_token_installs_session() {
        let token = make_token(alice_claims(FUTURE_EXP));
        let ctx = SessionContext::new(MemoryStorage::with_entry("token", &token), "token");

        let session = ctx.restore(now()).unwrap();
        assert_eq!(session.user.id, 1);
        assert_eq!(session.user.email, None);
        assert_eq!(ctx.token(), Some(token));
        assert!(ctx.is_authenticated());
    }

    #[test]
    fn restore_expired_token_clears_storage_idempotently() {
        let token = make_token(alice_claims(now().as_secs() - 1));
        let ctx = SessionContext::new(MemoryStorage::with_entry("token", &token), "token");

        assert_eq!(ctx.restore(now()), None);
        assert_eq!(ctx.stored_token(), None);
        assert_eq!(ctx.restore(now()), None);
        assert_eq!(ctx.stored_token(), None);
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn restore_undecodable_token_clears_storage() {
        let ctx = SessionContext::new(MemoryStorage::with_entry("token", "not-a-jwt"), "token");
        assert_eq!(ctx.restore(now()), None);
        assert_eq!(ctx.stored_token(), None);
    }

    #[test]
    fn establish_then_restore_in_fresh_context() {
        let token = make_token(alice_claims(FUTURE_EXP));
        let storage = Arc::new(MemoryStorage::new());
        let ctx = SessionContext::new(storage.clone(), "token");
        ctx.establish(session_from_token(&token, now()).unwrap());

        let reloaded = SessionContext::new(storage, "token");
        assert_eq!(reloaded.restore(now()), ctx.current());
    }

    #[test]
    fn establish_persists_the_bare_token() {
        let token = make_token(alice_claims(FUTURE_EXP));
        let storage = Arc::new(MemoryStorage::new());
        let ctx = SessionContext::new(storage.clone(), "token");
        ctx.establish(session_from_token(&token, now()).unwrap());

        assert_eq!(storage.get("token"), Some(token.clone()));
        assert!(!storage.get("token").unwrap().starts_with('"'));
        assert_eq!(ctx.stored_token(), Some(token));
    }

    #[test]
    fn clear_forgets_everything() {
        let token = make_token(alice_claims(FUTURE_EXP));
        let ctx = SessionContext::new(MemoryStorage::new(), "token");
        ctx.establish(session_from_token(&token, now()).unwrap());
        ctx.clear();
        assert_eq!(ctx.token(), None);
        assert_eq!(ctx.stored_token(), None);
    }
}
