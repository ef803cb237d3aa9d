use std::collections::HashMap;

use serde::Serialize;
use url::form_urlencoded;

use crate::error::{ApiError, ApiResult};

pub use user_admin_shared::HttpMethod;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_FORM: &str = "application/x-www-form-urlencoded";

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// 通用 HTTP 请求结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    /// 仅在调用方未显式设置时添加请求头
    pub fn with_default_header(mut self, key: &str, value: &str) -> Self {
        let exists = self.headers.keys().any(|k| k.eq_ignore_ascii_case(key));
        if !exists {
            self.headers.insert(key.to_string(), value.to_string());
        }
        self
    }

    /// 大小写不敏感地读取请求头
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// 序列化为 JSON 请求体
    pub fn with_json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let payload = serde_json::to_string(body)
            .map_err(|e| ApiError::Request(format!("Failed to encode request: {e}")))?;
        self.body = Some(payload);
        Ok(self.with_header(CONTENT_TYPE, CONTENT_TYPE_JSON))
    }

    /// URL 编码表单请求体
    pub fn with_form<K: AsRef<str>, V: AsRef<str>>(mut self, fields: &[(K, V)]) -> Self {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in fields {
            serializer.append_pair(k.as_ref(), v.as_ref());
        }
        self.body = Some(serializer.finish());
        self.with_header(CONTENT_TYPE, CONTENT_TYPE_FORM)
    }

    /// 追加查询参数，保留 URL 中已有的参数
    pub fn with_query<K: AsRef<str>, V: AsRef<str>>(mut self, pairs: &[(K, V)]) -> Self {
        if pairs.is_empty() {
            return self;
        }
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in pairs {
            serializer.append_pair(k.as_ref(), v.as_ref());
        }
        let separator = if self.url.contains('?') { '&' } else { '?' };
        self.url = format!("{}{}{}", self.url, separator, serializer.finish());
        self
    }

    /// 去掉查询串后的路径部分（用于日志）
    pub fn path(&self) -> &str {
        self.url.split('?').next().unwrap_or(&self.url)
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 检查响应是否成功 (2xx)
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// HTTP 客户端特性 (Trait)
///
/// 使用 async_trait 以支持异步调用，(?Send) 是因为浏览器环境下 fetch 相关类型不是 Send 的。
///
/// 实现方只负责传输：请求无法构建时返回 `ApiError::Request`，
/// 已发出但没有响应时返回 `ApiError::Network`。任何状态码都作为 `Ok` 返回。
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse>;
}

#[async_trait::async_trait(?Send)]
impl<C: HttpClient + ?Sized> HttpClient for std::rc::Rc<C> {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        (**self).send(req).await
    }
}

// =========================================================
// 实现层: reqwest 客户端 (Native)
// =========================================================

#[cfg(not(target_arch = "wasm32"))]
pub use native::ReqwestHttpClient;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::time::Duration;

    use super::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
    use crate::error::{ApiError, ApiResult};

    #[derive(Clone)]
    pub struct ReqwestHttpClient {
        client: reqwest::Client,
    }

    impl ReqwestHttpClient {
        pub fn new(timeout: Duration) -> ApiResult<Self> {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| ApiError::Config(format!("Failed to build HTTP client: {e}")))?;
            Ok(Self { client })
        }
    }

    fn map_error(e: reqwest::Error) -> ApiError {
        if e.is_builder() {
            ApiError::Request(e.to_string())
        } else if e.is_timeout() {
            ApiError::Network(format!("Request timed out: {e}"))
        } else {
            ApiError::Network(e.to_string())
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for ReqwestHttpClient {
        async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
            let method = match req.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Put => reqwest::Method::PUT,
                HttpMethod::Delete => reqwest::Method::DELETE,
            };

            let mut builder = self.client.request(method, &req.url);

            for (k, v) in req.headers {
                builder = builder.header(k, v);
            }

            if let Some(body) = req.body {
                builder = builder.body(body);
            }

            let resp = builder.send().await.map_err(map_error)?;

            let status = resp.status().as_u16();
            let body = resp.text().await.map_err(map_error)?;

            Ok(HttpResponse { status, body })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_body_is_url_encoded() {
        let req = HttpRequest::new("http://api/login", HttpMethod::Post)
            .with_form(&[("username", "a b"), ("password", "p&w=1")]);
        assert_eq!(req.body.as_deref(), Some("username=a+b&password=p%26w%3D1"));
        assert_eq!(req.header("content-type"), Some(CONTENT_TYPE_FORM));
    }

    #[test]
    fn query_is_appended_to_url() {
        let req = HttpRequest::new("http://api/users", HttpMethod::Get)
            .with_query(&[("page", "1"), ("name", "Ann Lee")]);
        assert_eq!(req.url, "http://api/users?page=1&name=Ann+Lee");
        assert_eq!(req.path(), "http://api/users");

        let req = req.with_query(&[("size", "10")]);
        assert_eq!(req.url, "http://api/users?page=1&name=Ann+Lee&size=10");

        let empty: &[(&str, &str)] = &[];
        let req = HttpRequest::new("http://api/users", HttpMethod::Get).with_query(empty);
        assert_eq!(req.url, "http://api/users");
    }

    #[test]
    fn default_header_does_not_override_explicit_one() {
        let req = HttpRequest::new("http://api/login", HttpMethod::Post)
            .with_header("content-type", CONTENT_TYPE_FORM)
            .with_default_header(CONTENT_TYPE, CONTENT_TYPE_JSON);
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.header(CONTENT_TYPE), Some(CONTENT_TYPE_FORM));
    }

    #[test]
    fn json_body_sets_content_type() {
        let req = HttpRequest::new("http://api/user", HttpMethod::Post)
            .with_json(&serde_json::json!({"name": "Ann"}))
            .unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"Ann"}"#));
        assert_eq!(req.header(CONTENT_TYPE), Some(CONTENT_TYPE_JSON));
    }

    #[test]
    fn response_ok_covers_2xx_only() {
        assert!(HttpResponse::new(200, "").ok());
        assert!(HttpResponse::new(204, "").ok());
        assert!(!HttpResponse::new(301, "").ok());
        assert!(!HttpResponse::new(404, "").ok());
    }
}
