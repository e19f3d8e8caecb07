use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::layout::ErrorAlert;
use crate::components::login::FieldError;
use crate::forms::{FieldErrors, RegisterForm};
use crate::store::{self, NotificationLevel};
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn RegisterPage() -> impl IntoView {
    let app = use_app();

    let form = RwSignal::new(RegisterForm::default());
    let errors = RwSignal::new(FieldErrors::default());
    let submitting = move || app.auth.with(|state| state.status.loading);
    let server_error = Signal::derive(move || app.auth.with(|state| state.status.error.clone()));

    on_cleanup(move || app.auth.update(|state| state.clear_error()));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let data = match form.with_untracked(RegisterForm::validate) {
            Ok(data) => data,
            Err(field_errors) => {
                errors.set(field_errors);
                return;
            }
        };
        errors.set(FieldErrors::default());

        let client = app.client();
        spawn_local(async move {
            if store::auth::register(client.as_ref(), &app.auth, &data).await.is_ok() {
                app.notify("Account created", NotificationLevel::Success);
            }
        });
    };

    view! {
        <div class="flex items-center justify-center min-h-screen bg-base-200">
            <div class="card w-full max-w-sm shadow-2xl bg-base-100">
                <form class="card-body" on:submit=on_submit>
                    <h1 class="text-2xl font-bold text-center">"Create account"</h1>
                    <ErrorAlert message=server_error />
                    <label class="form-control">
                        <span class="label-text">"Username"</span>
                        <input
                            type="text"
                            class="input input-bordered"
                            prop:value=move || form.with(|f| f.username.clone())
                            on:input=move |ev| form.update(|f| f.username = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="username" />
                    </label>
                    <label class="form-control">
                        <span class="label-text">"Email (optional)"</span>
                        <input
                            type="email"
                            class="input input-bordered"
                            prop:value=move || form.with(|f| f.email.clone())
                            on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="email" />
                    </label>
                    <label class="form-control">
                        <span class="label-text">"Password"</span>
                        <input
                            type="password"
                            class="input input-bordered"
                            prop:value=move || form.with(|f| f.password.clone())
                            on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="password" />
                    </label>
                    <label class="form-control">
                        <span class="label-text">"Confirm password"</span>
                        <input
                            type="password"
                            class="input input-bordered"
                            prop:value=move || form.with(|f| f.confirm_password.clone())
                            on:input=move |ev| form.update(|f| f.confirm_password = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="confirm_password" />
                    </label>
                    <button type="submit" class="btn btn-primary mt-4" disabled=submitting>"Register"</button>
                    <p class="text-sm text-center mt-2">
                        "Already registered? "
                        <Link to=AppRoute::Login class="link link-primary">"Sign in"</Link>
                    </p>
                </form>
            </div>
        </div>
    }
}
