use leptos::prelude::*;
use user_admin::AppRoute;

use crate::auth::AuthContext;
use crate::components::home::HomePage;
use crate::components::layout::{Notice, Toast};
use crate::components::login::LoginPage;
use crate::components::user_detail::UserDetailPage;
use crate::components::user_form::UserEditor;
use crate::components::user_list::UserListPage;
use crate::web::router::{Link, Router, RouterOutlet};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Users => view! { <UserListPage /> }.into_any(),
        AppRoute::CreateUser => view! { <UserEditor user_id=None /> }.into_any(),
        AppRoute::EditUser(id) => view! { <UserEditor user_id=Some(id) /> }.into_any(),
        AppRoute::UserDetail(id) => view! { <UserDetailPage user_id=id /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                    <Link to="/">
                        <span class="btn btn-primary mt-6">"返回首页"</span>
                    </Link>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 创建认证上下文（从 LocalStorage 读取 token）
    let auth_ctx = AuthContext::new();
    provide_context(auth_ctx);

    // 2. 应用级通知：注销失败等消息在路由跳转后仍需显示
    let (notice, set_notice) = signal(Notice::None);
    provide_context(set_notice);

    // 3. 获取认证状态信号，用于注入路由服务
    let is_authenticated = auth_ctx.is_authenticated_signal();

    view! {
        <Toast notice=notice set_notice=set_notice />
        // 4. 路由器组件：注入认证信号实现守卫
        <Router is_authenticated=is_authenticated>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
