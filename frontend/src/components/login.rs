use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::layout::ErrorAlert;
use crate::forms::{FieldErrors, LoginForm};
use crate::store::{self, NotificationLevel};
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 表单字段下方的错误提示
#[component]
pub fn FieldError(errors: RwSignal<FieldErrors>, field: &'static str) -> impl IntoView {
    view! {
        <Show when=move || errors.with(|e| e.get(field).is_some())>
            <span class="label-text-alt text-error">
                {move || errors.with(|e| e.get(field).unwrap_or_default().to_string())}
            </span>
        </Show>
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let app = use_app();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let errors = RwSignal::new(FieldErrors::default());
    let submitting = move || app.auth.with(|state| state.status.loading);
    let server_error = Signal::derive(move || app.auth.with(|state| state.status.error.clone()));

    // 离开页面时清掉旧错误
    on_cleanup(move || app.auth.update(|state| state.clear_error()));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let form = LoginForm {
            username: username.get_untracked(),
            password: password.get_untracked(),
        };
        let credentials = match form.validate() {
            Ok(credentials) => credentials,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        errors.set(FieldErrors::default());

        let client = app.client();
        spawn_local(async move {
            // 成功后由路由服务根据认证状态跳转到原目标
            if let Ok(outcome) = store::auth::login(client.as_ref(), &app.auth, &credentials).await {
                app.notify(format!("Welcome, {}", outcome.user.username), NotificationLevel::Success);
            }
        });
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-sm shadow-2xl bg-base-100">
                <form class="card-body" on:submit=on_submit>
                    <h1 class="text-2xl font-bold text-center">"Sign in"</h1>
                    <ErrorAlert message=server_error />
                    <label class="form-control">
                        <span class="label-text">"Username"</span>
                        <input
                            type="text"
                            class="input input-bordered"
                            autocomplete="username"
                            prop:value=username
                            on:input=move |ev| set_username.set(event_target_value(&ev))
                        />
                        <FieldError errors=errors field="username" />
                    </label>
                    <label class="form-control">
                        <span class="label-text">"Password"</span>
                        <input
                            type="password"
                            class="input input-bordered"
                            autocomplete="current-password"
                            prop:value=password
                            on:input=move |ev| set_password.set(event_target_value(&ev))
                        />
                        <FieldError errors=errors field="password" />
                    </label>
                    <button type="submit" class="btn btn-primary mt-4" disabled=submitting>
                        <Show when=submitting>
                            <span class="loading loading-spinner"></span>
                        </Show>
                        "Sign in"
                    </button>
                    <p class="text-sm text-center mt-2">
                        "No account? "
                        <Link to=AppRoute::Register class="link link-primary">"Register"</Link>
                    </p>
                </form>
            </div>
        </div>
    }
}
