//! 用户管理后台前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `user_admin::route`: 路由表与守卫（领域模型，与平台无关）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 认证状态管理
//! - `components`: UI 组件层
//!
//! 除 `config` 外，所有模块只在 wasm32 目标下编译。

pub mod config;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod auth;
#[cfg(target_arch = "wasm32")]
mod components {
    pub mod home;
    pub mod layout;
    pub mod login;
    pub mod user_detail;
    pub mod user_form;
    pub mod user_list;
}

// 原生 Web API 封装模块
// 对浏览器原生 API 的轻量级封装，替代 gloo-net / gloo-storage，以减小 WASM 体积。
#[cfg(target_arch = "wasm32")]
pub(crate) mod web {
    mod console;
    mod http;
    pub mod router;
    mod storage;

    pub use console::init_logging;
    pub use http::FetchHttpClient;
    pub use storage::WebSession;
}

#[cfg(target_arch = "wasm32")]
pub use app::App;
#[cfg(target_arch = "wasm32")]
pub use web::init_logging;
