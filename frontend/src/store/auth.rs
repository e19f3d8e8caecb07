use news_desk_shared::{LoginRequest, RegisterRequest, User};

use super::{LoadStatus, Partition, StateCell, track};
use crate::api::AuthOutcome;
use crate::client::Client;
use crate::error::{ApiError, ApiResult, ErrorKind};
use crate::session::Session;
use crate::web::HttpTransport;

/// 认证分区
///
/// `user` 始终来自令牌声明；资料请求只补充令牌中没有的字段（如 email）。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub token: Option<String>,
    pub status: LoadStatus,
}

impl Partition for AuthState {
    fn status_mut(&mut self) -> &mut LoadStatus {
        &mut self.status
    }
}

impl AuthState {
    pub fn from_session(session: Option<Session>) -> Self {
        let mut state = Self::default();
        state.adopt(session);
        state
    }

    fn adopt(&mut self, session: Option<Session>) {
        match session {
            Some(session) => {
                self.is_authenticated = true;
                self.user = Some(session.user);
                self.token = Some(session.token);
            }
            None => {
                self.is_authenticated = false;
                self.user = None;
                self.token = None;
            }
        }
    }

    pub fn signed_in(&mut self, outcome: &AuthOutcome) {
        self.adopt(Some(Session {
            token: outcome.token.clone(),
            user: outcome.user.clone(),
        }));
    }

    pub fn signed_out(&mut self) {
        self.adopt(None);
        self.status = LoadStatus::default();
    }

    /// 合并资料：id、角色、机构保持令牌中的值
    pub fn profile_loaded(&mut self, profile: &User) {
        let Some(user) = self.user.as_mut() else {
            return;
        };
        if user.id != profile.id {
            return;
        }
        user.username = profile.username.clone();
        user.email = profile.email.clone();
        user.agency = profile.agency.clone();
    }

    pub fn clear_error(&mut self) {
        self.status.clear_error();
    }
}

pub async fn login<T: HttpTransport, C: StateCell<AuthState>>(
    client: &Client<T>,
    cell: &C,
    credentials: &LoginRequest,
) -> ApiResult<AuthOutcome> {
    track(
        &client.policy,
        cell,
        "auth/login",
        "Login failed",
        client.api.login(credentials),
        AuthState::signed_in,
    )
    .await
}

pub async fn register<T: HttpTransport, C: StateCell<AuthState>>(
    client: &Client<T>,
    cell: &C,
    data: &RegisterRequest,
) -> ApiResult<AuthOutcome> {
    track(
        &client.policy,
        cell,
        "auth/register",
        "Registration failed",
        client.api.register(data),
        AuthState::signed_in,
    )
    .await
}

/// 注销，仅清理本地状态
pub fn logout<T: HttpTransport, C: StateCell<AuthState>>(client: &Client<T>, cell: &C) {
    client.api.logout();
    cell.update(AuthState::signed_out);
    tracing::info!("signed out");
}

/// 启动时从持久化令牌恢复认证分区
pub fn rehydrate<T: HttpTransport, C: StateCell<AuthState>>(client: &Client<T>, cell: &C) -> bool {
    let session = client.restore_session();
    let restored = session.is_some();
    cell.update(|state| state.adopt(session));
    restored
}

/// 获取当前用户的完整资料
pub async fn fetch_profile<T: HttpTransport, C: StateCell<AuthState>>(
    client: &Client<T>,
    cell: &C,
) -> ApiResult<User> {
    let Some(user_id) = cell.read(|state| state.user.as_ref().map(|u| u.id)) else {
        return Err(ApiError::new(ErrorKind::Unauthorized, "Not signed in"));
    };

    track(
        &client.policy,
        cell,
        "auth/profile",
        "Failed to fetch profile",
        client.api.get_user_by_id(user_id),
        AuthState::profile_loaded,
    )
    .await
}
