use leptos::prelude::*;
use leptos::task::spawn_local;
use user_admin_shared::{PageResponse, UserQuery, UserRecord};

use crate::auth::browser_api;
use crate::components::layout::{AppShell, Notice, Toast};
use crate::web::router::{Link, use_router};

const PAGE_SIZE: u32 = 10;

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
pub fn UserListPage() -> impl IntoView {
    let router = use_router();

    let (page, set_page) = signal(PageResponse::<UserRecord> {
        items: Vec::new(),
        total: 0,
        page: 1,
        size: PAGE_SIZE,
    });
    let (loading, set_loading) = signal(true);
    let (notice, set_notice) = signal(Notice::None);

    // 搜索框输入 与 实际生效的查询分开保存
    let (username_input, set_username_input) = signal(String::new());
    let (name_input, set_name_input) = signal(String::new());
    let (query, set_query) = signal(UserQuery {
        page: Some(1),
        size: Some(PAGE_SIZE),
        ..Default::default()
    });

    let load_users = move || {
        let params = query.get_untracked();
        set_loading.set(true);
        spawn_local(async move {
            match browser_api().get_user_list(Some(&params)).await {
                Ok(env) => match env.into_result() {
                    Ok(Some(data)) => set_page.set(data),
                    Ok(None) => set_page.update(|p| {
                        p.items.clear();
                        p.total = 0;
                    }),
                    Err(msg) => set_notice.set(Some((format!("加载用户失败: {}", msg), true))),
                },
                Err(e) => set_notice.set(Some((format!("加载用户失败: {}", e.user_message()), true))),
            }
            set_loading.set(false);
        });
    };

    // 查询条件变化时重新加载
    Effect::new(move |_| {
        query.track();
        load_users();
    });

    let on_search = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        set_query.set(UserQuery {
            page: Some(1),
            size: Some(PAGE_SIZE),
            username: non_empty(username_input.get_untracked()),
            name: non_empty(name_input.get_untracked()),
        });
    };

    let on_reset = move |_| {
        set_username_input.set(String::new());
        set_name_input.set(String::new());
        set_query.set(UserQuery {
            page: Some(1),
            size: Some(PAGE_SIZE),
            ..Default::default()
        });
    };

    let current_page = move || query.with(|q| q.page.unwrap_or(1));
    let page_count = move || page.with(|p| p.page_count());
    let go_to_page = move |target: u32| {
        set_query.update(|q| q.page = Some(target));
    };

    let handle_delete = move |user: UserRecord| {
        let confirmed = window()
            .confirm_with_message(&format!("确定删除用户 {} 吗？", user.username))
            .unwrap_or(false);
        if !confirmed {
            return;
        }
        spawn_local(async move {
            match browser_api().delete_user(user.id).await {
                Ok(env) if env.is_success() => {
                    set_notice.set(Some(("用户已删除".to_string(), false)));
                    load_users();
                }
                Ok(env) => set_notice.set(Some((format!("删除用户失败: {}", env.msg), true))),
                Err(e) => set_notice.set(Some((format!("删除用户失败: {}", e.user_message()), true))),
            }
        });
    };

    let total_users = move || page.with(|p| p.total);
    let is_empty = move || page.with(|p| p.items.is_empty());

    view! {
        <AppShell title="用户列表">
            <Toast notice=notice set_notice=set_notice />

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body">
                    <form class="flex flex-wrap items-end gap-2" on:submit=on_search>
                        <input
                            type="text"
                            placeholder="用户名"
                            class="input input-bordered input-sm"
                            on:input=move |ev| set_username_input.set(event_target_value(&ev))
                            prop:value=username_input
                        />
                        <input
                            type="text"
                            placeholder="姓名"
                            class="input input-bordered input-sm"
                            on:input=move |ev| set_name_input.set(event_target_value(&ev))
                            prop:value=name_input
                        />
                        <button type="submit" class="btn btn-primary btn-sm">"搜索"</button>
                        <button type="button" class="btn btn-ghost btn-sm" on:click=on_reset>"重置"</button>
                        <div class="flex-1"></div>
                        <button type="button" class="btn btn-success btn-sm" on:click=move |_| router.navigate("/users/create")>
                            "新建用户"
                        </button>
                    </form>
                </div>
            </div>

            <div class="card bg-base-100 shadow-xl">
                <div class="card-body p-0">
                    <div class="flex items-center justify-between p-6 pb-2">
                        <p class="text-base-content/70 text-sm">"共 " {total_users} " 个用户"</p>
                        <button
                            on:click=move |_| load_users()
                            disabled=move || loading.get()
                            class="btn btn-ghost btn-sm"
                        >
                            "刷新"
                        </button>
                    </div>

                    <div class="overflow-x-auto w-full">
                        <table class="table table-zebra w-full">
                            <thead>
                                <tr>
                                    <th>"ID"</th>
                                    <th>"用户名"</th>
                                    <th>"姓名"</th>
                                    <th>"状态"</th>
                                    <th class="hidden md:table-cell">"超级管理员"</th>
                                    <th class="hidden md:table-cell">"创建时间"</th>
                                    <th></th>
                                </tr>
                            </thead>
                            <tbody>
                                <Show when=move || is_empty() && !loading.get()>
                                    <tr>
                                        <td colspan="7" class="text-center py-8 text-base-content/50">
                                            "没有符合条件的用户。"
                                        </td>
                                    </tr>
                                </Show>
                                <Show when=move || loading.get() && is_empty()>
                                    <tr>
                                        <td colspan="7" class="text-center py-8 text-base-content/50">
                                            <span class="loading loading-spinner loading-md"></span> " 加载中..."
                                        </td>
                                    </tr>
                                </Show>
                                <For
                                    each=move || page.get().items
                                    key=|u| u.id
                                    children=move |user| {
                                        let id = user.id;
                                        let target = user.clone();
                                        view! {
                                            <tr>
                                                <td class="font-mono text-sm">{id}</td>
                                                <td class="font-bold">
                                                    <Link to=format!("/users/{}", id)>{user.username.clone()}</Link>
                                                </td>
                                                <td>{user.name.clone()}</td>
                                                <td>
                                                    {if user.status {
                                                        view! { <span class="badge badge-success">"启用"</span> }.into_any()
                                                    } else {
                                                        view! { <span class="badge badge-ghost">"停用"</span> }.into_any()
                                                    }}
                                                </td>
                                                <td class="hidden md:table-cell">
                                                    {if user.is_superuser { "是" } else { "否" }}
                                                </td>
                                                <td class="hidden md:table-cell font-mono text-xs opacity-70">
                                                    {user.created_time.clone()}
                                                </td>
                                                <td>
                                                    <div class="flex gap-1">
                                                        <Link to=format!("/users/{}/edit", id)>
                                                            <span class="btn btn-ghost btn-xs">"编辑"</span>
                                                        </Link>
                                                        <button
                                                            class="btn btn-ghost btn-xs text-error"
                                                            on:click=move |_| handle_delete(target.clone())
                                                        >
                                                            "删除"
                                                        </button>
                                                    </div>
                                                </td>
                                            </tr>
                                        }
                                    }
                                />
                            </tbody>
                        </table>
                    </div>

                    <div class="flex items-center justify-center gap-2 p-4">
                        <button
                            class="btn btn-sm"
                            disabled=move || current_page() <= 1 || loading.get()
                            on:click=move |_| go_to_page(current_page().saturating_sub(1).max(1))
                        >
                            "上一页"
                        </button>
                        <span class="text-sm">{current_page} " / " {page_count}</span>
                        <button
                            class="btn btn-sm"
                            disabled=move || u64::from(current_page()) >= page_count() || loading.get()
                            on:click=move |_| go_to_page(current_page() + 1)
                        >
                            "下一页"
                        </button>
                    </div>
                </div>
            </div>
        </AppShell>
    }
}
