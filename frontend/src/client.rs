//! 客户端组合
//!
//! `SessionPolicy` 同时持有会话与导航，是唯一对 401 作出反应的地方：
//! 清除会话、强制跳转登录页，然后把原始错误原样交还调用方。

use std::sync::Arc;

use news_desk_shared::Timestamp;

use crate::api::NewsDeskApi;
use crate::config::ClientConfig;
use crate::error::ApiResult;
use crate::session::{Session, SessionContext};
use crate::web::{FetchTransport, HttpTransport, LocalStorage};

/// 导航能力（由路由服务实现）
pub trait Navigator: Send + Sync {
    /// 会话失效后强制进入登录页
    fn force_login(&self);
}

/// 401 处理策略
#[derive(Clone)]
pub struct SessionPolicy {
    session: SessionContext,
    navigator: Arc<dyn Navigator>,
}

impl SessionPolicy {
    pub fn new(session: SessionContext, navigator: Arc<dyn Navigator>) -> Self {
        Self { session, navigator }
    }

    /// 检查网关结果；401 时拆除会话并跳转，结果本身不变
    pub fn settle<T>(&self, result: ApiResult<T>) -> ApiResult<T> {
        if let Err(error) = &result {
            if error.is_unauthorized() {
                tracing::warn!("unauthorized response, tearing down session");
                self.session.clear();
                self.navigator.force_login();
            }
        }
        result
    }
}

/// API 包装层与 401 策略的组合，store 中的所有异步操作都经由它发起
pub struct Client<T> {
    pub api: NewsDeskApi<T>,
    pub policy: SessionPolicy,
}

impl<T: HttpTransport> Client<T> {
    pub fn new(
        config: &ClientConfig,
        transport: T,
        session: SessionContext,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            api: NewsDeskApi::new(config.api_base_url.clone(), transport, session.clone()),
            policy: SessionPolicy::new(session, navigator),
        }
    }

    pub fn session(&self) -> &SessionContext {
        self.api.session()
    }

    /// 启动时从存储恢复会话
    pub fn restore_session(&self) -> Option<Session> {
        self.session().restore(Timestamp::now())
    }
}

impl Client<FetchTransport> {
    /// 浏览器默认组合：fetch + LocalStorage 中的会话
    pub fn browser(config: &ClientConfig, navigator: Arc<dyn Navigator>) -> Self {
        Self::new(config, FetchTransport, browser_session(config), navigator)
    }
}

/// 以配置的存储键在 LocalStorage 上建立会话上下文
pub fn browser_session(config: &ClientConfig) -> SessionContext {
    SessionContext::new(LocalStorage, config.token_storage_key.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, ErrorKind};
    use crate::testing::{RecordingNavigator, signed_in_session};

    #[test]
    fn unauthorized_clears_session_and_redirects() {
        let (session, _) = signed_in_session();
        let navigator = Arc::new(RecordingNavigator::default());
        let policy = SessionPolicy::new(session.clone(), navigator.clone());

        let result: ApiResult<()> = policy.settle(Err(ApiError::from_response(401, "")));

        assert_eq!(result.unwrap_err().kind, ErrorKind::Unauthorized);
        assert!(!session.is_authenticated());
        assert_eq!(session.stored_token(), None);
        assert_eq!(navigator.redirects(), 1);
    }

    #[test]
    fn other_errors_are_local() {
        let (session, _) = signed_in_session();
        let navigator = Arc::new(RecordingNavigator::default());
        let policy = SessionPolicy::new(session.clone(), navigator.clone());

        let result: ApiResult<()> = policy.settle(Err(ApiError::from_response(500, "")));

        assert!(result.is_err());
        assert!(session.is_authenticated());
        assert_eq!(navigator.redirects(), 0);
    }

    #[test]
    fn success_passes_through() {
        let (session, _) = signed_in_session();
        let navigator = Arc::new(RecordingNavigator::default());
        let policy = SessionPolicy::new(session, navigator.clone());

        assert_eq!(policy.settle(Ok(3)), Ok(3));
        assert_eq!(navigator.redirects(), 0);
    }
}
