//! HTTP 客户端封装
//!
//! 在传输层之上完成两件事：
//! 1. 发送前从注入的 `SessionStore` 读取 token，存在时附加 `Authorization: Bearer <token>`
//! 2. 收到 2xx 响应后把响应体解析为 `Envelope<T>` 原样返回（不拆包）
//!
//! 失败不做重试，按三种形态分别记录日志后返回给调用方。

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use user_admin_shared::{BEARER_PREFIX, Envelope, HEADER_AUTHORIZATION};

use crate::config::ClientConfig;
use crate::error::{ApiError, ApiResult};
use crate::request::{CONTENT_TYPE, CONTENT_TYPE_JSON, HttpClient, HttpMethod, HttpRequest};
use crate::session::SessionStore;

/// 附加调用方自定义的请求头或查询参数
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn query(query: Vec<(String, String)>) -> Self {
        Self {
            query,
            ..Default::default()
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

pub struct ApiClient<C, S> {
    http: C,
    session: S,
    config: ClientConfig,
}

impl<C: HttpClient, S: SessionStore> ApiClient<C, S> {
    pub fn new(http: C, session: S, config: ClientConfig) -> Self {
        Self {
            http,
            session,
            config,
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 以 base_url + path 构造请求
    pub fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(&self.config.url(path), method)
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> ApiResult<Envelope<T>> {
        let req = self.request(HttpMethod::Get, path);
        self.send(apply_options(req, options)).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> ApiResult<Envelope<T>> {
        let req = with_optional_json(self.request(HttpMethod::Post, path), body)?;
        self.send(apply_options(req, options)).await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&B>,
        options: Option<RequestOptions>,
    ) -> ApiResult<Envelope<T>> {
        let req = with_optional_json(self.request(HttpMethod::Put, path), body)?;
        self.send(apply_options(req, options)).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        path: &str,
        options: Option<RequestOptions>,
    ) -> ApiResult<Envelope<T>> {
        let req = self.request(HttpMethod::Delete, path);
        self.send(apply_options(req, options)).await
    }

    /// URL 编码表单 POST（登录接口使用）
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> ApiResult<Envelope<T>> {
        let req = self.request(HttpMethod::Post, path).with_form(fields);
        self.send(req).await
    }

    /// 请求拦截 -> 发送 -> 响应拦截
    pub async fn send<T: DeserializeOwned>(&self, req: HttpRequest) -> ApiResult<Envelope<T>> {
        let req = self.authorize(req.with_default_header(CONTENT_TYPE, CONTENT_TYPE_JSON));
        let method = req.method;
        let path = req.path().to_string();
        debug!(%method, %path, "sending request");

        let resp = match self.http.send(req).await {
            Ok(resp) => resp,
            Err(e) => {
                log_failure(method, &path, &e);
                return Err(e);
            }
        };

        if !resp.ok() {
            let e = ApiError::Status {
                status: resp.status,
                body: resp.body,
            };
            log_failure(method, &path, &e);
            return Err(e);
        }

        serde_json::from_str::<Envelope<T>>(&resp.body).map_err(|e| {
            let e = ApiError::from(e);
            log_failure(method, &path, &e);
            e
        })
    }

    /// 从存储中读取 token 并设置认证头，空 token 不发送
    fn authorize(&self, req: HttpRequest) -> HttpRequest {
        match self.session.bearer_token() {
            Some(token) => {
                req.with_header(HEADER_AUTHORIZATION, &format!("{BEARER_PREFIX}{token}"))
            }
            None => req,
        }
    }
}

fn with_optional_json<B: Serialize + ?Sized>(
    req: HttpRequest,
    body: Option<&B>,
) -> ApiResult<HttpRequest> {
    match body {
        Some(body) => req.with_json(body),
        None => Ok(req),
    }
}

fn apply_options(req: HttpRequest, options: Option<RequestOptions>) -> HttpRequest {
    let Some(options) = options else {
        return req;
    };
    let req = req.with_query(&options.query);
    options
        .headers
        .iter()
        .fold(req, |req, (k, v)| req.with_header(k, v))
}

fn log_failure(method: HttpMethod, path: &str, e: &ApiError) {
    match e {
        ApiError::Status { status, body } => {
            error!(%method, %path, status, %body, "API error: server returned an error status")
        }
        ApiError::Network(msg) => {
            error!(%method, %path, error = %msg, "Network error: no response received")
        }
        ApiError::Request(msg) => {
            error!(%method, %path, error = %msg, "Request error: could not build request")
        }
        other => error!(%method, %path, error = %other, "Response error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpResponse;
    use crate::session::MemorySessionStore;
    use std::cell::RefCell;

    /// 记录所有请求并按顺序返回预设响应
    struct MockHttp {
        requests: RefCell<Vec<HttpRequest>>,
        responses: RefCell<Vec<ApiResult<HttpResponse>>>,
    }

    impl MockHttp {
        fn replying(response: ApiResult<HttpResponse>) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                responses: RefCell::new(vec![response]),
            }
        }

        fn last(&self) -> HttpRequest {
            self.requests.borrow().last().cloned().unwrap()
        }
    }

    #[async_trait::async_trait(?Send)]
    impl HttpClient for MockHttp {
        async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
            self.requests.borrow_mut().push(req);
            self.responses.borrow_mut().remove(0)
        }
    }

    fn client(http: MockHttp, store: MemorySessionStore) -> ApiClient<MockHttp, MemorySessionStore> {
        ApiClient::new(http, store, ClientConfig::new("http://api.test"))
    }

    #[tokio::test]
    async fn attaches_bearer_token_when_present() {
        let http = MockHttp::replying(Ok(HttpResponse::new(200, r#"{"code":0,"msg":"ok"}"#)));
        let api = client(http, MemorySessionStore::with_token("abc.def.ghi"));

        let env: Envelope = api.get("/users", None).await.unwrap();
        assert!(env.is_success());

        let req = api.http.last();
        assert_eq!(req.url, "http://api.test/users");
        assert_eq!(req.header("Authorization"), Some("Bearer abc.def.ghi"));
        assert_eq!(req.header(CONTENT_TYPE), Some(CONTENT_TYPE_JSON));
    }

    #[tokio::test]
    async fn omits_authorization_without_token() {
        let http = MockHttp::replying(Ok(HttpResponse::new(200, r#"{"code":0,"data":null}"#)));
        let api = client(http, MemorySessionStore::new());

        let _: Envelope = api.delete("/user/1", None).await.unwrap();
        assert_eq!(api.http.last().header("Authorization"), None);
    }

    #[tokio::test]
    async fn empty_token_sends_no_authorization() {
        let http = MockHttp::replying(Ok(HttpResponse::new(200, r#"{"code":0}"#)));
        let api = client(http, MemorySessionStore::with_token(""));

        let _: Envelope = api.get("/users", None).await.unwrap();
        assert_eq!(api.http.last().header("Authorization"), None);
    }

    #[tokio::test]
    async fn passes_envelope_through_even_with_non_zero_code() {
        let http = MockHttp::replying(Ok(HttpResponse::new(
            200,
            r#"{"code":7,"msg":"User not found","data":null}"#,
        )));
        let api = client(http, MemorySessionStore::new());

        let env: Envelope<serde_json::Value> = api.get("/user/9", None).await.unwrap();
        assert_eq!(env.code, 7);
        assert_eq!(env.msg, "User not found");
        assert_eq!(env.data, None);
    }

    #[tokio::test]
    async fn non_2xx_becomes_status_error() {
        let http = MockHttp::replying(Ok(HttpResponse::new(
            401,
            r#"{"code":401,"msg":"Not authenticated","data":null}"#,
        )));
        let api = client(http, MemorySessionStore::new());

        let err = api.get::<serde_json::Value>("/users", None).await.unwrap_err();
        assert_eq!(err.status_code(), Some(401));
        assert_eq!(err.user_message(), "Not authenticated");
    }

    #[tokio::test]
    async fn transport_errors_are_returned_unchanged() {
        let http = MockHttp::replying(Err(ApiError::Network("connection refused".into())));
        let api = client(http, MemorySessionStore::new());

        let err = api
            .post::<(), serde_json::Value>("/logout", None, None)
            .await
            .unwrap_err();
        assert_eq!(err, ApiError::Network("connection refused".into()));
    }

    #[tokio::test]
    async fn unparsable_success_body_is_decode_error() {
        let http = MockHttp::replying(Ok(HttpResponse::new(200, "<html>gateway</html>")));
        let api = client(http, MemorySessionStore::new());

        let err = api.get::<serde_json::Value>("/users", None).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[tokio::test]
    async fn options_add_query_and_headers() {
        let http = MockHttp::replying(Ok(HttpResponse::new(200, r#"{"code":0}"#)));
        let api = client(http, MemorySessionStore::new());

        let options = RequestOptions::query(vec![("page".into(), "2".into())])
            .header("X-Request-Id", "r-1");
        let _: Envelope = api.get("/users", Some(options)).await.unwrap();

        let req = api.http.last();
        assert_eq!(req.url, "http://api.test/users?page=2");
        assert_eq!(req.header("x-request-id"), Some("r-1"));
    }

    #[tokio::test]
    async fn put_serializes_json_body() {
        let http = MockHttp::replying(Ok(HttpResponse::new(200, r#"{"code":0}"#)));
        let api = client(http, MemorySessionStore::new());

        let body = serde_json::json!({"name": "Ann"});
        let _: Envelope = api.put("/user/3", Some(&body), None).await.unwrap();

        let req = api.http.last();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.body.as_deref(), Some(r#"{"name":"Ann"}"#));
    }
}
