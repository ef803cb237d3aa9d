//! 认证模块
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由服务通过注入的认证信号来检查认证状态。
//! Token 本身只保存在 LocalStorage 中，这里的信号只是它的镜像。

use leptos::prelude::*;
use tracing::warn;
use user_admin::{ApiClient, SessionStore, UserApi};
use user_admin_shared::{CurrentUser, LoginRequest};

use crate::config::AppConfig;
use crate::web::{FetchHttpClient, WebSession};

/// 浏览器端的用户 API
pub type BrowserApi = UserApi<FetchHttpClient, WebSession>;

/// 按当前配置构建 API 客户端
///
/// 实例不持有状态（token 每次从 LocalStorage 读取），按需创建即可。
pub fn browser_api() -> BrowserApi {
    let config = AppConfig::load().client_config();
    let http = FetchHttpClient::new(config.timeout_ms);
    let session = WebSession::new(config.token_key.clone());
    UserApi::new(ApiClient::new(http, session, config))
}

/// 认证上下文
///
/// 包含读写信号，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    /// 是否已认证（token 是否存在）
    pub is_authenticated: RwSignal<bool>,
    /// token 载荷中的当前用户
    pub current_user: RwSignal<Option<CurrentUser>>,
}

impl AuthContext {
    /// 创建新的认证上下文，初始状态从 LocalStorage 读取
    pub fn new() -> Self {
        let ctx = Self {
            is_authenticated: RwSignal::new(false),
            current_user: RwSignal::new(None),
        };
        ctx.refresh();
        ctx
    }

    /// 重新读取 token 并更新信号
    pub fn refresh(&self) {
        let api = browser_api();
        // 路由守卫使用：空 token 视为未登录
        let authenticated = api.client().session().bearer_token().is_some();
        let user = if authenticated {
            api.get_current_user().data
        } else {
            None
        };
        self.is_authenticated.set(authenticated);
        self.current_user.set(user);
    }

    /// 获取认证状态信号（用于路由服务注入）
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        self.is_authenticated.into()
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

/// 登录
///
/// 成功时 token 已由 API 层写入存储；业务失败（code 非 0）返回服务端消息。
pub async fn login(ctx: AuthContext, username: String, password: String) -> Result<(), String> {
    let api = browser_api();
    let result = api
        .login(&LoginRequest { username, password })
        .await
        .map_err(|e| e.user_message());

    ctx.refresh();

    let env = result?;
    if !env.is_success() {
        return Err(env.msg);
    }
    if api.client().session().bearer_token().is_none() {
        warn!("login succeeded without an access token");
        return Err("登录响应中没有 token".to_string());
    }
    Ok(())
}

/// 注销
///
/// 本地 token 总会被清除，导航由路由服务的认证状态监听自动处理。
pub async fn logout(ctx: AuthContext) -> Result<(), String> {
    let result = browser_api().logout().await;
    ctx.refresh();
    result.map(|_| ()).map_err(|e| e.user_message())
}
