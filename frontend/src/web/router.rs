//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 每次导航（主动跳转、浏览器前进后退、认证状态变化）都先经过路由守卫。

use leptos::prelude::*;
use tracing::info;
use user_admin::route::{AppRoute, GuardOutcome, guard};
use wasm_bindgen::prelude::*;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

fn log_outcome(target: &AppRoute, outcome: &GuardOutcome) {
    if outcome.is_redirect() {
        info!(target = %target, redirect = %outcome.route(), "[Router] redirected by guard");
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入认证检查信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 认证状态检查（注入的信号，实现解耦）
    is_authenticated: Signal<bool>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// 初始路由（从 URL 解析）同样经过守卫，重定向时使用 replaceState。
    fn new(is_authenticated: Signal<bool>) -> Self {
        let target = AppRoute::from_path(&current_path());
        let outcome = guard(target.clone(), is_authenticated.get_untracked());
        log_outcome(&target, &outcome);
        if outcome.is_redirect() {
            replace_history_state(&outcome.route().to_path());
        }
        let (current_route, set_route) = signal(outcome.into_route());

        Self {
            current_route,
            set_route,
            is_authenticated,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path));
    }

    /// 导航到指定路由
    pub fn navigate_to_route(&self, target_route: AppRoute) {
        let outcome = guard(target_route.clone(), self.is_authenticated.get_untracked());
        log_outcome(&target_route, &outcome);

        // 放行与重定向都推入 History，地址栏始终显示实际渲染的页面
        let route = outcome.into_route();
        push_history_state(&route.to_path());
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target_route = AppRoute::from_path(&current_path());

            // popstate 时也执行守卫逻辑，重定向时替换当前历史记录
            let outcome = guard(target_route.clone(), is_authenticated.get_untracked());
            log_outcome(&target_route, &outcome);
            if outcome.is_redirect() {
                replace_history_state(&outcome.route().to_path());
            }
            set_route.set(outcome.into_route());
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 设置认证状态变化时的自动重定向
    ///
    /// 登录后离开登录页，注销后离开受保护页面，规则与导航守卫相同。
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let route = current_route.get_untracked();

            let outcome = guard(route.clone(), is_auth);
            if outcome.is_redirect() {
                info!(
                    authenticated = is_auth,
                    redirect = %outcome.route(),
                    "[Router] auth state changed"
                );
                push_history_state(&outcome.route().to_path());
                set_route.set(outcome.into_route());
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 认证状态信号
    is_authenticated: Signal<bool>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(is_authenticated);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接：拦截点击，交给路由服务导航
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let to_clone = to.clone();
    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate(&to_clone);
    };

    view! {
        <a href=to on:click=on_click>
            {children()}
        </a>
    }
}
