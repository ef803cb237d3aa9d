//! 路由定义与路由守卫 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、它们的认证要求，以及每次导航前执行的守卫规则。

use std::fmt::Display;

use crate::session::SessionStore;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 `/`
    #[default]
    Home,
    /// 登录页 `/login`
    Login,
    /// 用户列表 `/users`
    Users,
    /// 新建用户 `/users/create`
    CreateUser,
    /// 编辑用户 `/users/:id/edit`
    EditUser(i64),
    /// 用户详情 `/users/:id`
    UserDetail(i64),
    /// 页面未找到
    NotFound,
}

/// 路由元信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteMeta {
    pub name: &'static str,
    pub requires_auth: bool,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    ///
    /// 查询串、片段和末尾的 `/` 会被忽略；`:id` 必须是整数。
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["users"] => Self::Users,
            ["users", "create"] => Self::CreateUser,
            ["users", id, "edit"] => id.parse().map_or(Self::NotFound, Self::EditUser),
            ["users", id] => id.parse().map_or(Self::NotFound, Self::UserDetail),
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Login => "/login".to_string(),
            Self::Users => "/users".to_string(),
            Self::CreateUser => "/users/create".to_string(),
            Self::EditUser(id) => format!("/users/{id}/edit"),
            Self::UserDetail(id) => format!("/users/{id}"),
            Self::NotFound => "/404".to_string(),
        }
    }

    pub fn meta(&self) -> RouteMeta {
        let (name, requires_auth) = match self {
            Self::Home => ("home", false),
            Self::Login => ("login", false),
            Self::Users => ("users", true),
            Self::CreateUser => ("createUser", true),
            Self::EditUser(_) => ("editUser", true),
            Self::UserDetail(_) => ("userDetail", true),
            Self::NotFound => ("notFound", false),
        };
        RouteMeta {
            name,
            requires_auth,
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        self.meta().requires_auth
    }

    pub fn is_login(&self) -> bool {
        matches!(self, Self::Login)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取已登录用户访问登录页时的重定向目标
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 路由守卫 (Route Guard)
// =========================================================

/// 单次导航的守卫结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    /// 放行到目标路由
    Allowed(AppRoute),
    /// 重定向到另一个路由
    Redirected(AppRoute),
}

impl GuardOutcome {
    /// 最终应当渲染的路由
    pub fn route(&self) -> &AppRoute {
        match self {
            GuardOutcome::Allowed(route) | GuardOutcome::Redirected(route) => route,
        }
    }

    pub fn into_route(self) -> AppRoute {
        match self {
            GuardOutcome::Allowed(route) | GuardOutcome::Redirected(route) => route,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, GuardOutcome::Redirected(_))
    }
}

/// 导航前的守卫规则
///
/// 纯函数：结果只取决于目标路由的元信息和当前是否持有 token。
/// - 需要认证但未登录：重定向到登录页
/// - 已登录但访问登录页：重定向到首页
/// - 其他情况正常导航
pub fn guard(target: AppRoute, is_authenticated: bool) -> GuardOutcome {
    if target.requires_auth() && !is_authenticated {
        GuardOutcome::Redirected(AppRoute::auth_failure_redirect())
    } else if target.is_login() && is_authenticated {
        GuardOutcome::Redirected(AppRoute::auth_success_redirect())
    } else {
        GuardOutcome::Allowed(target)
    }
}

/// 绑定了 token 存储的路由守卫
pub struct RouteGuard<S> {
    session: S,
}

impl<S: SessionStore> RouteGuard<S> {
    pub fn new(session: S) -> Self {
        Self { session }
    }

    /// 每次导航前调用，实时读取 token
    ///
    /// 空字符串 token 按未登录处理。
    pub fn before_each(&self, target: AppRoute) -> GuardOutcome {
        guard(target, self.session.bearer_token().is_some())
    }

    /// 按 URL path 解析并执行守卫
    pub fn resolve(&self, path: &str) -> GuardOutcome {
        self.before_each(AppRoute::from_path(path))
    }
}
