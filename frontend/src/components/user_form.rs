use leptos::prelude::*;
use leptos::task::spawn_local;
use user_admin_shared::UserForm;

use crate::auth::browser_api;
use crate::components::layout::AppShell;
use crate::web::router::use_router;

/// 提交前的本地校验，返回第一条错误
fn validate(form: &UserForm, creating: bool) -> Result<(), String> {
    if form.username.trim().is_empty() {
        return Err("用户名不能为空".to_string());
    }
    if form.name.trim().is_empty() {
        return Err("姓名不能为空".to_string());
    }
    if creating && form.password.is_empty() {
        return Err("新建用户时必须设置密码".to_string());
    }
    Ok(())
}

/// 新建 / 编辑用户
///
/// `user_id` 为 `None` 时是新建；否则先加载详情预填表单，密码留空。
#[component]
pub fn UserEditor(user_id: Option<i64>) -> impl IntoView {
    let router = use_router();
    let creating = user_id.is_none();

    let form = RwSignal::new(UserForm {
        status: true,
        ..Default::default()
    });
    let (loading, set_loading) = signal(!creating);
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    if let Some(id) = user_id {
        spawn_local(async move {
            match browser_api().get_user_detail(id).await {
                Ok(env) => match env.into_result() {
                    Ok(Some(user)) => form.set(UserForm::from(&user)),
                    Ok(None) => set_error_msg.set(Some("用户不存在".to_string())),
                    Err(msg) => set_error_msg.set(Some(msg)),
                },
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
            set_loading.set(false);
        });
    }

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let data = form.get_untracked();
        if let Err(msg) = validate(&data, creating) {
            set_error_msg.set(Some(msg));
            return;
        }

        set_is_submitting.set(true);
        set_error_msg.set(None);

        spawn_local(async move {
            let api = browser_api();
            let result = match user_id {
                Some(id) => api.update_user(id, &data).await,
                None => api.create_user(&data).await,
            };
            match result {
                Ok(env) if env.is_success() => {
                    // 保存后进入详情页
                    match env.data.map(|user| user.id).or(user_id) {
                        Some(id) => router.navigate(&format!("/users/{}", id)),
                        None => router.navigate("/users"),
                    }
                }
                Ok(env) => set_error_msg.set(Some(env.msg)),
                Err(e) => set_error_msg.set(Some(e.user_message())),
            }
            set_is_submitting.set(false);
        });
    };

    let title = if creating { "新建用户" } else { "编辑用户" };
    let password_hint = if creating {
        "必填"
    } else {
        "留空则不修改"
    };

    view! {
        <AppShell title=title>
            <div class="card bg-base-100 shadow-xl max-w-2xl">
                <Show
                    when=move || !loading.get()
                    fallback=|| view! {
                        <div class="flex items-center justify-center p-8">
                            <span class="loading loading-spinner loading-lg text-primary"></span>
                        </div>
                    }
                >
                    <form class="card-body" on:submit=on_submit>
                        {move || error_msg.get().map(|msg| view! {
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{msg}</span>
                            </div>
                        })}

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"用户名"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.username.clone())
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"密码"</span>
                                <span class="label-text-alt">{password_hint}</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                autocomplete="new-password"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.password.clone())
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="name">
                                <span class="label-text">"姓名"</span>
                            </label>
                            <input
                                id="name"
                                type="text"
                                class="input input-bordered"
                                on:input=move |ev| form.update(|f| f.name = event_target_value(&ev))
                                prop:value=move || form.with(|f| f.name.clone())
                            />
                        </div>
                        <div class="form-control">
                            <label class="label" for="description">
                                <span class="label-text">"描述"</span>
                            </label>
                            <textarea
                                id="description"
                                class="textarea textarea-bordered"
                                on:input=move |ev| {
                                    let value = event_target_value(&ev);
                                    form.update(|f| {
                                        f.description = (!value.trim().is_empty()).then_some(value)
                                    })
                                }
                                prop:value=move || form.with(|f| f.description.clone().unwrap_or_default())
                            ></textarea>
                        </div>
                        <div class="form-control">
                            <label class="label cursor-pointer justify-start gap-4">
                                <input
                                    type="checkbox"
                                    class="toggle toggle-success"
                                    on:change=move |ev| form.update(|f| f.status = event_target_checked(&ev))
                                    prop:checked=move || form.with(|f| f.status)
                                />
                                <span class="label-text">"启用"</span>
                            </label>
                        </div>

                        <div class="card-actions justify-end mt-6">
                            <button
                                type="button"
                                class="btn btn-ghost"
                                on:click=move |_| match user_id {
                                    Some(id) => router.navigate(&format!("/users/{}", id)),
                                    None => router.navigate("/users"),
                                }
                            >
                                "取消"
                            </button>
                            <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                                {move || if is_submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "保存中..." }.into_any()
                                } else {
                                    "保存".into_any()
                                }}
                            </button>
                        </div>
                    </form>
                </Show>
            </div>
        </AppShell>
    }
}
