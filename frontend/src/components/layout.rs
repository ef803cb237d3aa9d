use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::auth::{logout, use_auth};
use crate::web::router::Link;

/// 通知消息：内容, 是否出错
pub type Notice = Option<(String, bool)>;

/// 获取应用级通知（由 App 提供，页面切换后仍然可见）
pub fn use_notice() -> WriteSignal<Notice> {
    use_context::<WriteSignal<Notice>>().expect("notice signal should be provided")
}

/// 受保护页面的公共外壳：导航栏 + 内容区
#[component]
pub fn AppShell(
    /// 页面标题
    #[prop(into)]
    title: String,
    children: Children,
) -> impl IntoView {
    let auth = use_auth();
    let (logging_out, set_logging_out) = signal(false);
    let set_notice = use_notice();

    let display_name = move || {
        auth.current_user
            .get()
            .and_then(|user| user.display_name())
            .unwrap_or_else(|| "管理员".to_string())
    };

    let on_logout = move |_| {
        set_logging_out.set(true);
        spawn_local(async move {
            // 失败时本地 token 也已清除，但仍提示服务端注销失败
            if let Err(msg) = logout(auth).await {
                set_notice.set(Some((format!("注销请求失败: {}", msg), true)));
            }
            set_logging_out.set(false);
        });
    };

    view! {
        <div class="min-h-screen bg-base-200 p-4 md:p-8 font-sans">
            <div class="max-w-7xl mx-auto space-y-8">
                <div class="navbar bg-base-100 rounded-box shadow-xl">
                    <div class="flex-1 gap-2">
                        <Link to="/">
                            <span class="btn btn-ghost text-xl">"用户管理后台"</span>
                        </Link>
                        <Link to="/users">
                            <span class="btn btn-ghost btn-sm">"用户列表"</span>
                        </Link>
                    </div>
                    <div class="flex-none gap-2">
                        <Show
                            when=move || auth.is_authenticated.get()
                            fallback=|| view! {
                                <Link to="/login">
                                    <span class="btn btn-primary">"登录"</span>
                                </Link>
                            }
                        >
                            <span class="badge badge-neutral hidden md:inline-flex">{display_name}</span>
                            <button
                                on:click=on_logout
                                disabled=move || logging_out.get()
                                class="btn btn-outline btn-error gap-2"
                            >
                                "退出登录"
                            </button>
                        </Show>
                    </div>
                </div>

                <h2 class="text-2xl font-bold">{title}</h2>

                {children()}
            </div>
        </div>
    }
}

/// 右上角通知提示框，3 秒后自动消失
#[component]
pub fn Toast(notice: ReadSignal<Notice>, set_notice: WriteSignal<Notice>) -> impl IntoView {
    Effect::new(move |_| {
        if notice.get().is_some() {
            set_timeout(
                move || set_notice.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    move || {
        notice.get().map(|(message, is_err)| {
            let class = if is_err {
                "alert alert-error shadow-lg"
            } else {
                "alert alert-success shadow-lg"
            };
            view! {
                <div class="toast toast-top toast-end z-50">
                    <div class=class>
                        <span>{message}</span>
                    </div>
                </div>
            }
        })
    }
}
