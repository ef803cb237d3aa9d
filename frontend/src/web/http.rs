//! HTTP 请求封装模块
//!
//! 使用 `web_sys::fetch` 实现核心库的 `HttpClient` 传输接口。
//! 超时通过 `AbortController` 实现，超时后请求按网络错误处理。

use async_trait::async_trait;
use gloo_timers::callback::Timeout;
use js_sys::Reflect;
use user_admin::{ApiError, ApiResult, HttpClient, HttpRequest, HttpResponse};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{AbortController, Headers, Request, RequestInit, Response};

/// 基于 fetch 的 HTTP 客户端
#[derive(Debug, Clone, Copy)]
pub struct FetchHttpClient {
    timeout_ms: u32,
}

impl FetchHttpClient {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            timeout_ms: u32::try_from(timeout_ms).unwrap_or(u32::MAX),
        }
    }

    fn build_request(
        req: &HttpRequest,
        controller: &AbortController,
    ) -> ApiResult<Request> {
        let headers = Headers::new()
            .map_err(|e| ApiError::Request(format!("创建 Headers 失败: {:?}", e)))?;

        for (key, value) in &req.headers {
            headers
                .set(key, value)
                .map_err(|e| ApiError::Request(format!("设置 Header 失败: {:?}", e)))?;
        }

        let opts = RequestInit::new();
        opts.set_method(req.method.as_str());
        opts.set_headers(&headers.into());
        opts.set_signal(Some(&controller.signal()));

        if let Some(body) = &req.body {
            opts.set_body(&JsValue::from_str(body));
        }

        Request::new_with_str_and_init(&req.url, &opts)
            .map_err(|e| ApiError::Request(format!("{:?}", e)))
    }
}

/// fetch 被 abort 时抛出 `AbortError`，其余都视为无响应
fn map_fetch_error(e: JsValue) -> ApiError {
    let name = Reflect::get(&e, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string());
    if name.as_deref() == Some("AbortError") {
        ApiError::Network("Request timed out".to_string())
    } else {
        ApiError::Network(format!("{:?}", e))
    }
}

#[async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ApiResult<HttpResponse> {
        let controller = AbortController::new()
            .map_err(|e| ApiError::Request(format!("创建 AbortController 失败: {:?}", e)))?;
        let request = Self::build_request(&req, &controller)?;

        let window =
            web_sys::window().ok_or_else(|| ApiError::Request("无法获取 window 对象".to_string()))?;

        // 计时器覆盖整个请求（包括读取响应体），离开作用域时自动取消
        let timeout_controller = controller.clone();
        let _timeout = Timeout::new(self.timeout_ms, move || timeout_controller.abort());

        let resp_value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(map_fetch_error)?;

        let response: Response = resp_value
            .dyn_into()
            .map_err(|e| ApiError::Decode(format!("Response 类型转换失败: {:?}", e)))?;

        let status = response.status();
        let promise = response.text().map_err(map_fetch_error)?;
        let body = JsFuture::from(promise)
            .await
            .map_err(map_fetch_error)?
            .as_string()
            .unwrap_or_default();

        Ok(HttpResponse::new(status, body))
    }
}
