use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::components::layout::{ErrorAlert, Spinner};
use crate::store::{self, NotificationLevel};
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

#[component]
pub fn NewsDetailPage(id: i64) -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let client = app.client();
    spawn_local(async move {
        let _ = store::news::fetch_news_by_id(client.as_ref(), &app.news, id).await;
    });
    on_cleanup(move || app.news.update(|state| state.clear_current()));

    let current = move || app.news.with(|state| state.current.clone().filter(|n| n.id == id));
    let loading = move || app.news.with(|state| state.status.loading);
    let error = Signal::derive(move || app.news.with(|state| state.status.error.clone()));
    let can_edit = move || {
        let user = app.auth.with(|state| state.user.clone());
        app.news.with(|state| {
            state
                .current
                .as_ref()
                .zip(user.as_ref())
                .is_some_and(|(news, user)| news.editable_by(user))
        })
    };

    let on_delete = move |_| {
        let client = app.client();
        spawn_local(async move {
            match store::news::delete_news(client.as_ref(), &app.news, id).await {
                Ok(_) => {
                    app.notify("News deleted", NotificationLevel::Success);
                    router.navigate(AppRoute::Home);
                }
                Err(e) => app.notify(e.user_message("Failed to delete news"), NotificationLevel::Error),
            }
        });
    };

    view! {
        <ErrorAlert message=error />
        <Show when=move || !loading() || current().is_some() fallback=|| view! { <Spinner /> }>
            {move || {
                current()
                    .map(|news| {
                        let author = news.author.as_ref().map(|a| a.username.clone()).unwrap_or_default();
                        let agency = news.agency.as_ref().map(|a| a.name.clone()).unwrap_or_default();
                        let category = news.category.as_ref().map(|c| c.name.clone()).unwrap_or_default();
                        let published = match news.published_at {
                            Some(at) => at.format("%Y-%m-%d %H:%M").to_string(),
                            None => "Draft".to_string(),
                        };
                        view! {
                            <article class="card bg-base-100 shadow-xl">
                                <div class="card-body space-y-4">
                                    <h1 class="text-3xl font-bold">{news.title}</h1>
                                    <div class="flex flex-wrap gap-2 text-sm">
                                        <span class="badge badge-neutral">{category}</span>
                                        <span class="badge badge-outline">{agency}</span>
                                        <span class="opacity-70">{author}</span>
                                        <span class="opacity-70">{published}</span>
                                    </div>
                                    <p class="whitespace-pre-line">{news.content}</p>
                                </div>
                            </article>
                        }
                    })
            }}
            <div class="flex gap-2 mt-6">
                <Link to=AppRoute::Home class="btn btn-ghost">"Back"</Link>
                <Show when=can_edit>
                    <Link to=AppRoute::NewsEditor(Some(id)) class="btn btn-primary">"Edit"</Link>
                    <button class="btn btn-error btn-outline" on:click=on_delete>"Delete"</button>
                </Show>
            </div>
        </Show>
    }
}
