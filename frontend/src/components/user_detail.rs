use leptos::prelude::*;
use leptos::task::spawn_local;
use user_admin_shared::UserRecord;

use crate::auth::browser_api;
use crate::components::layout::AppShell;
use crate::web::router::use_router;

#[component]
pub fn UserDetailPage(user_id: i64) -> impl IntoView {
    let router = use_router();

    let (user, set_user) = signal(Option::<UserRecord>::None);
    let (loading, set_loading) = signal(true);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    spawn_local(async move {
        match browser_api().get_user_by_id(user_id).await {
            Ok(env) => match env.into_result() {
                Ok(data) => set_user.set(data),
                Err(msg) => set_error_msg.set(Some(msg)),
            },
            Err(e) => set_error_msg.set(Some(e.user_message())),
        }
        set_loading.set(false);
    });

    let row = |label: &'static str, value: String| {
        view! {
            <tr>
                <th class="w-40">{label}</th>
                <td>{value}</td>
            </tr>
        }
    };

    let details = move || {
        user.get().map(|u| {
            view! {
                <table class="table w-full">
                    <tbody>
                        {row("ID", u.id.to_string())}
                        {row("用户名", u.username.clone())}
                        {row("姓名", u.name.clone())}
                        {row("状态", if u.status { "启用" } else { "停用" }.to_string())}
                        {row("超级管理员", if u.is_superuser { "是" } else { "否" }.to_string())}
                        {row("描述", u.description.clone().unwrap_or_else(|| "-".to_string()))}
                        {row("创建时间", u.created_time.clone())}
                        {row("更新时间", u.updated_time.clone())}
                    </tbody>
                </table>
            }
        })
    };

    view! {
        <AppShell title="用户详情">
            <div class="card bg-base-100 shadow-xl max-w-2xl">
                <div class="card-body">
                    <Show when=move || loading.get()>
                        <div class="flex items-center justify-center p-8">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    </Show>
                    {move || error_msg.get().map(|msg| view! {
                        <div role="alert" class="alert alert-error text-sm py-2">
                            <span>{msg}</span>
                        </div>
                    })}
                    {details}
                    <div class="card-actions justify-end mt-4">
                        <button class="btn btn-ghost" on:click=move |_| router.navigate("/users")>
                            "返回列表"
                        </button>
                        <button
                            class="btn btn-primary"
                            on:click=move |_| router.navigate(&format!("/users/{}/edit", user_id))
                        >
                            "编辑"
                        </button>
                    </div>
                </div>
            </div>
        </AppShell>
    }
}
