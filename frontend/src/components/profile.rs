use leptos::prelude::*;
use leptos::task::spawn_local;
use news_desk_shared::Role;

use crate::components::layout::ErrorAlert;
use crate::store;
use crate::use_app;

fn role_badge(role: Role) -> &'static str {
    match role {
        Role::Admin => "badge badge-error",
        Role::Author => "badge badge-primary",
        Role::Reader => "badge badge-ghost",
    }
}

#[component]
pub fn ProfilePage() -> impl IntoView {
    let app = use_app();

    // 令牌里没有 email 等字段，进入页面时补齐
    let client = app.client();
    spawn_local(async move {
        let _ = store::auth::fetch_profile(client.as_ref(), &app.auth).await;
    });

    let user = move || app.auth.with(|state| state.user.clone());
    let error = Signal::derive(move || app.auth.with(|state| state.status.error.clone()));

    view! {
        <ErrorAlert message=error />
        {move || {
            user()
                .map(|user| {
                    let agency = user
                        .agency
                        .as_ref()
                        .map(|a| a.name.clone())
                        .or_else(|| user.agency_id.map(|id| format!("#{id}")))
                        .unwrap_or_else(|| "None".to_string());
                    view! {
                        <div class="card bg-base-100 shadow-xl max-w-xl">
                            <div class="card-body space-y-2">
                                <h1 class="card-title text-2xl">
                                    {user.username.clone()}
                                    <span class=role_badge(user.role)>{user.role.as_str()}</span>
                                </h1>
                                <p>"Email: " {user.email.clone().unwrap_or_else(|| "Not provided".to_string())}</p>
                                <p>"Agency: " {agency}</p>
                                <p class="opacity-60">"User ID: " {user.id}</p>
                            </div>
                        </div>
                    }
                })
        }}
    }
}
