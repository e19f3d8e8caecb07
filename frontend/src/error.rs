use serde::Deserialize;
use serde_json::Value;

// =========================================================
// 错误类型枚举
// =========================================================

/// 错误类型
/// 包含错误对应的语义（状态码）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 网络层失败，未收到响应
    Network,
    /// 401: 令牌缺失或失效，触发全局会话清理
    Unauthorized,
    /// 400/422: 服务端校验失败
    Validation,
    /// 409: 资源冲突（如分类名称重复）
    Conflict,
    /// 404: 资源未找到
    NotFound,
    /// 其他服务端错误
    Server,
    /// 响应体或令牌无法解析
    Decode,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 => ErrorKind::Unauthorized,
            409 => ErrorKind::Conflict,
            404 => ErrorKind::NotFound,
            400 | 422 => ErrorKind::Validation,
            _ => ErrorKind::Server,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ErrorKind::Network => "NETWORK_ERROR",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Validation => "INVALID_INPUT",
            ErrorKind::Conflict => "RESOURCE_CONFLICT",
            ErrorKind::NotFound => "RESOURCE_NOT_FOUND",
            ErrorKind::Server => "SERVER_ERROR",
            ErrorKind::Decode => "DECODE_ERROR",
        }
    }
}

// =========================================================
// 核心错误类型
// =========================================================

/// Failure of one API call, normalized for the store and the views.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("[{}] {message}", .kind.error_code())]
pub struct ApiError {
    pub kind: ErrorKind,
    pub message: String,
    /// 响应状态码（网络错误时为空）
    pub status: Option<u16>,
    /// 消息是否来自服务端响应体
    server_message: bool,
}

impl ApiError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            server_message: false,
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Decode, message)
    }

    /// 根据非 2xx 响应构建错误
    ///
    /// 响应体形如 `{"message": "..."}` 或 `{"message": ["...", "..."]}` 时使用其中的消息，
    /// 否则使用状态码描述。
    pub fn from_response(status: u16, body: &str) -> Self {
        let parsed = server_message(body);
        Self {
            kind: ErrorKind::from_status(status),
            server_message: parsed.is_some(),
            message: parsed.unwrap_or_else(|| format!("Request failed with status {status}")),
            status: Some(status),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ErrorKind::Unauthorized
    }

    pub fn is_conflict(&self) -> bool {
        self.kind == ErrorKind::Conflict
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Message shown to the user; `fallback` stands in when the server gave
    /// no explanation of its own.
    pub fn user_message(&self, fallback: &str) -> String {
        if self.server_message {
            self.message.clone()
        } else {
            fallback.to_string()
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

#[derive(Deserialize)]
struct ServerErrorBody {
    message: Value,
}

fn server_message(body: &str) -> Option<String> {
    let parsed: ServerErrorBody = serde_json::from_str(body).ok()?;
    match parsed.message {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .into_iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect();
            (!parts.is_empty()).then(|| parts.join("; "))
        }
        _ => None,
    }
}

// =========================================================
// 令牌错误
// =========================================================

/// Reasons a stored or freshly issued token cannot back a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token has no payload segment")]
    Malformed,
    #[error("token payload is not valid base64url: {0}")]
    Encoding(String),
    #[error("token claims are invalid: {0}")]
    Claims(String),
    #[error("token expired")]
    Expired,
}

impl From<TokenError> for ApiError {
    fn from(e: TokenError) -> Self {
        ApiError::decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_maps_to_kind() {
        assert_eq!(ErrorKind::from_status(401), ErrorKind::Unauthorized);
        assert_eq!(ErrorKind::from_status(409), ErrorKind::Conflict);
        assert_eq!(ErrorKind::from_status(404), ErrorKind::NotFound);
        assert_eq!(ErrorKind::from_status(422), ErrorKind::Validation);
        assert_eq!(ErrorKind::from_status(503), ErrorKind::Server);
    }

    #[test]
    fn server_message_is_extracted() {
        let err = ApiError::from_response(409, r#"{"message":"Category already exists"}"#);
        assert!(err.is_conflict());
        assert_eq!(err.message(), "Category already exists");
        assert_eq!(err.status, Some(409));
        assert_eq!(err.user_message("Failed to create category"), "Category already exists");
    }

    #[test]
    fn message_lists_are_joined() {
        let err = ApiError::from_response(400, r#"{"message":["title should not be empty","content should not be empty"]}"#);
        assert_eq!(err.message(), "title should not be empty; content should not be empty");
    }

    #[test]
    fn fallback_used_without_server_message() {
        let err = ApiError::from_response(500, "<html>oops</html>");
        assert_eq!(err.user_message("Failed to fetch news"), "Failed to fetch news");

        let err = ApiError::network("connection refused");
        assert_eq!(err.user_message("Failed to fetch news"), "Failed to fetch news");
    }

    #[test]
    fn display_includes_code() {
        let err = ApiError::from_response(404, r#"{"message":"News not found"}"#);
        assert_eq!(err.to_string(), "[RESOURCE_NOT_FOUND] News not found");
    }
}
