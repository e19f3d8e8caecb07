use leptos::prelude::*;
use news_desk_shared::Role;

use crate::store::{self, NotificationLevel};
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::Link;

/// 页面框架：导航栏 + 通知 + 内容
#[component]
pub fn Layout(children: Children) -> impl IntoView {
    let app = use_app();
    let role = move || app.auth.with(|state| state.user.as_ref().map(|u| u.role));
    let username = move || {
        app.auth
            .with(|state| state.user.as_ref().map(|u| u.username.clone()).unwrap_or_default())
    };

    let on_logout = move |_| {
        store::auth::logout(app.client().as_ref(), &app.auth);
        app.notify("Signed out", NotificationLevel::Info);
    };

    view! {
        <div class="min-h-screen bg-base-200 font-sans">
            <NotificationToast />
            <div class="navbar bg-base-100 shadow-xl">
                <div class="flex-1 gap-2">
                    <Link to=AppRoute::Home class="btn btn-ghost text-xl">"News Desk"</Link>
                    <Show when=move || role().is_some_and(Role::can_author)>
                        <Link to=AppRoute::AgencyNews class="btn btn-ghost btn-sm">"Agency news"</Link>
                        <Link to=AppRoute::NewsEditor(None) class="btn btn-ghost btn-sm">"Write"</Link>
                    </Show>
                    <Show when=move || role().is_some_and(Role::is_admin)>
                        <Link to=AppRoute::AdminCategories class="btn btn-ghost btn-sm">"Categories"</Link>
                    </Show>
                </div>
                <div class="flex-none gap-2">
                    <Show
                        when=move || role().is_some()
                        fallback=|| view! {
                            <Link to=AppRoute::Login class="btn btn-primary btn-sm">"Sign in"</Link>
                        }
                    >
                        <Link to=AppRoute::Profile class="btn btn-ghost btn-sm">{username}</Link>
                        <button on:click=on_logout class="btn btn-outline btn-error btn-sm">"Sign out"</button>
                    </Show>
                </div>
            </div>
            <main class="max-w-7xl mx-auto p-4 md:p-8">{children()}</main>
        </div>
    }
}

/// 单条临时通知，到期由 `AppContext::notify` 安排的定时器隐藏
#[component]
pub fn NotificationToast() -> impl IntoView {
    let app = use_app();
    let notification = move || app.ui.with(|ui| ui.notification.clone());

    view! {
        <Show when=move || notification().open>
            <div class="toast toast-top toast-end z-50">
                <div class=move || format!("alert {} shadow-lg", notification().level.css_class())>
                    <span>{move || notification().message}</span>
                    <button
                        class="btn btn-ghost btn-xs"
                        on:click=move |_| app.ui.update(|ui| ui.hide_notification())
                    >
                        "✕"
                    </button>
                </div>
            </div>
        </Show>
    }
}

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex items-center justify-center min-h-[60vh]">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-error">"404"</h1>
                <p class="text-xl mt-4">"Page not found"</p>
                <Link to=AppRoute::Home class="btn btn-primary mt-6">"Back to news"</Link>
            </div>
        </div>
    }
}

/// 加载指示
#[component]
pub fn Spinner() -> impl IntoView {
    view! {
        <div class="flex justify-center py-12">
            <span class="loading loading-spinner loading-lg text-primary"></span>
        </div>
    }
}

/// 分区错误提示
#[component]
pub fn ErrorAlert(#[prop(into)] message: Signal<Option<String>>) -> impl IntoView {
    view! {
        <Show when=move || message.with(Option::is_some)>
            <div class="alert alert-error my-4">
                <span>{move || message.get().unwrap_or_default()}</span>
            </div>
        </Show>
    }
}
