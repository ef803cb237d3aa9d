use thiserror::Error;
use user_admin_shared::Envelope;

/// 客户端统一错误类型
///
/// 传输层失败分为三类（仅用于日志区分）：
/// - `Status`: 服务端返回了非 2xx 状态码
/// - `Network`: 请求已发出但没有收到响应（包括超时）
/// - `Request`: 请求本身无法构建
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("request failed ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request error: {0}")]
    Request(String),

    /// 2xx 响应但响应体不是合法的 Envelope
    #[error("response error: {0}")]
    Decode(String),

    #[error("config error: {0}")]
    Config(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

impl ApiError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// 尝试把错误响应体解析为服务端的 Envelope
    pub fn envelope(&self) -> Option<Envelope> {
        match self {
            ApiError::Status { body, .. } => serde_json::from_str(body).ok(),
            _ => None,
        }
    }

    /// 面向用户的错误信息：优先使用服务端 msg
    pub fn user_message(&self) -> String {
        if let Some(env) = self.envelope().filter(|env| !env.msg.is_empty()) {
            return env.msg;
        }
        match self {
            ApiError::Status { status, body } => {
                let trimmed = body.trim();
                if trimmed.is_empty() {
                    format!("Request failed ({status}).")
                } else {
                    let excerpt: String = trimmed.chars().take(MAX_ERROR_CHARS).collect();
                    format!("Request failed ({status}): {excerpt}")
                }
            }
            other => other.to_string(),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_server_msg() {
        let err = ApiError::Status {
            status: 400,
            body: r#"{"code":1001,"msg":"Username already exists","data":null}"#.to_string(),
        };
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.envelope().map(|e| e.code), Some(1001));
        assert_eq!(err.user_message(), "Username already exists");
    }

    #[test]
    fn user_message_truncates_plain_bodies() {
        let err = ApiError::Status {
            status: 502,
            body: "x".repeat(500),
        };
        assert!(err.envelope().is_none());
        let msg = err.user_message();
        assert!(msg.starts_with("Request failed (502): "));
        assert_eq!(msg.chars().filter(|c| *c == 'x').count(), MAX_ERROR_CHARS);

        let empty = ApiError::Status {
            status: 500,
            body: "  ".to_string(),
        };
        assert_eq!(empty.user_message(), "Request failed (500).");
    }

    #[test]
    fn transport_errors_have_no_envelope() {
        let err = ApiError::Network("connection refused".to_string());
        assert_eq!(err.status_code(), None);
        assert!(err.envelope().is_none());
        assert_eq!(err.user_message(), "network error: connection refused");
    }
}
