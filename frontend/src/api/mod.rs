//! API 客户端
//!
//! `NewsDeskApi` 是所有请求的唯一出口：拼接地址与查询参数、附加
//! `Authorization: Bearer <token>`、序列化请求体、按状态码归类错误。
//! 401 只被标记为 `ErrorKind::Unauthorized`，清理会话与跳转由
//! `client::SessionPolicy` 决定。

mod agencies;
mod auth;
mod categories;
mod news;
mod users;

pub use auth::AuthOutcome;

use news_desk_shared::protocol::ApiRequest;
use news_desk_shared::{BEARER_PREFIX, CONTENT_TYPE_JSON, HEADER_AUTHORIZATION, HEADER_CONTENT_TYPE};

use crate::error::{ApiError, ApiResult, ErrorKind};
use crate::session::SessionContext;
use crate::web::{HttpRequest, HttpTransport};

pub struct NewsDeskApi<T> {
    base_url: String,
    pub(crate) transport: T,
    session: SessionContext,
}

impl<T: HttpTransport> NewsDeskApi<T> {
    pub fn new(base_url: impl Into<String>, transport: T, session: SessionContext) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            session,
        }
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn build<R: ApiRequest>(&self, request: &R) -> ApiResult<HttpRequest> {
        let mut http = HttpRequest::new(&self.url(&request.path()), R::METHOD)
            .with_header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON);

        for (key, value) in request.query() {
            http = http.with_query(key, &value);
        }

        if let Some(token) = self.session.token() {
            http = http.with_header(HEADER_AUTHORIZATION, &format!("{BEARER_PREFIX}{token}"));
        }

        if let Some(body) = request.body() {
            let json = serde_json::to_string(body)
                .map_err(|e| ApiError::decode(format!("request body: {e}")))?;
            http = http.with_body(json);
        }

        Ok(http)
    }

    /// 执行一次请求并解码响应
    pub async fn execute<R: ApiRequest>(&self, request: &R) -> ApiResult<R::Response> {
        let http = self.build(request)?;
        let method = R::METHOD.as_str();
        let path = request.path();

        let response = self.transport.send(http).await.map_err(|e| {
            tracing::warn!(method, path = %path, error = %e, "request failed before response");
            ApiError::network(e.to_string())
        })?;

        tracing::debug!(method, path = %path, status = response.status, "api exchange");

        if !response.ok() {
            let error = ApiError::from_response(response.status, &response.body);
            if error.kind == ErrorKind::Unauthorized {
                tracing::warn!(method, path = %path, "request rejected as unauthorized");
            }
            return Err(error);
        }

        let body = if response.body.trim().is_empty() {
            "null"
        } else {
            response.body.as_str()
        };

        serde_json::from_str(body).map_err(|e| {
            tracing::error!(method, path = %path, error = %e, "response body could not be decoded");
            ApiError::decode(e.to_string())
        })
    }
}
