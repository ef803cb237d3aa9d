//! 用户管理后台客户端核心
//!
//! 与平台无关的部分都在这里：
//! - `request`: HTTP 传输抽象（浏览器端与原生端各有实现）
//! - `client`: 认证头注入与 Envelope 透传
//! - `api`: 用户资源 API
//! - `session`: Session Token 存储抽象
//! - `token`: token 载荷解析
//! - `route`: 路由表与路由守卫

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod route;
pub mod session;
pub mod token;

pub use api::UserApi;
pub use client::{ApiClient, RequestOptions};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use request::{HttpClient, HttpMethod, HttpRequest, HttpResponse};
pub use route::{AppRoute, GuardOutcome, RouteGuard, guard};
pub use session::{MemorySessionStore, SessionStore};

pub use user_admin_shared as shared;

#[cfg(not(target_arch = "wasm32"))]
pub use request::ReqwestHttpClient;

/// 使用 reqwest 传输构建原生环境下的用户 API
#[cfg(not(target_arch = "wasm32"))]
pub fn native_api<S: SessionStore>(
    config: ClientConfig,
    session: S,
) -> ApiResult<UserApi<ReqwestHttpClient, S>> {
    let http = ReqwestHttpClient::new(config.timeout())?;
    Ok(UserApi::new(ApiClient::new(http, session, config)))
}

/// 与 `native_api` 相同，但配置从 `USER_ADMIN_*` 环境变量读取
#[cfg(not(target_arch = "wasm32"))]
pub fn native_api_from_env<S: SessionStore>(
    session: S,
) -> ApiResult<UserApi<ReqwestHttpClient, S>> {
    native_api(ClientConfig::from_env(), session)
}
