use news_desk_shared::{AuthTokenResponse, LoginRequest, RegisterRequest, User};

use super::NewsDeskApi;
use crate::error::ApiResult;
use crate::session::{Session, decode_claims};
use crate::web::HttpTransport;

/// 登录/注册成功后得到的令牌与由其推导出的用户
#[derive(Debug, Clone, PartialEq)]
pub struct AuthOutcome {
    pub token: String,
    pub user: User,
}

impl<T: HttpTransport> NewsDeskApi<T> {
    /// 登录，成功时持久化令牌
    pub async fn login(&self, credentials: &LoginRequest) -> ApiResult<AuthOutcome> {
        let response = self.execute(credentials).await?;
        self.adopt_token(response)
    }

    /// 注册，成功时与登录一样直接建立会话
    pub async fn register(&self, data: &RegisterRequest) -> ApiResult<AuthOutcome> {
        let response = self.execute(data).await?;
        self.adopt_token(response)
    }

    /// 注销：仅清除本地会话，不调用服务端
    pub fn logout(&self) {
        self.session.clear();
    }

    /// 令牌必须先能解码，之后才会被保存
    fn adopt_token(&self, response: AuthTokenResponse) -> ApiResult<AuthOutcome> {
        let claims = decode_claims(&response.access_token)?;
        let user = claims.to_user();
        self.session.establish(Session {
            token: response.access_token.clone(),
            user: user.clone(),
        });
        tracing::info!(user_id = user.id, role = %user.role, "signed in");
        Ok(AuthOutcome {
            token: response.access_token,
            user,
        })
    }
}
