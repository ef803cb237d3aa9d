use leptos::prelude::*;
use user_admin_shared::CurrentUser;

use crate::auth::use_auth;
use crate::components::layout::AppShell;
use crate::web::router::Link;

/// 首页：展示 token 中的当前用户信息
#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();

    let field = move |pick: fn(&CurrentUser) -> Option<String>| {
        move || {
            auth.current_user
                .get()
                .as_ref()
                .and_then(pick)
                .unwrap_or_else(|| "-".to_string())
        }
    };

    view! {
        <AppShell title="首页">
            <div class="stats shadow w-full stats-vertical md:stats-horizontal bg-base-100">
                <div class="stat">
                    <div class="stat-title">"当前用户"</div>
                    <div class="stat-value text-primary text-2xl">
                        {field(|u| u.display_name())}
                    </div>
                    <div class="stat-desc">{field(|u| u.username())}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"用户 ID"</div>
                    <div class="stat-value text-2xl">{field(|u| u.id().map(|id| id.to_string()))}</div>
                </div>
                <div class="stat">
                    <div class="stat-title">"角色"</div>
                    <div class="stat-value text-secondary text-2xl">
                        {field(|u| u.is_superuser().map(|su| if su { "超级管理员" } else { "普通用户" }.to_string()))}
                    </div>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <h3 class="card-title">"快速入口"</h3>
                    <div class="flex gap-2">
                        <Link to="/users">
                            <span class="btn btn-primary">"用户列表"</span>
                        </Link>
                        <Link to="/users/create">
                            <span class="btn btn-outline">"新建用户"</span>
                        </Link>
                    </div>
                </div>
            </div>
        </AppShell>
    }
}
