use leptos::prelude::*;
use leptos::task::spawn_local;
use news_desk_shared::Role;

use crate::components::layout::Spinner;
use crate::components::login::FieldError;
use crate::components::news_list::{load_agencies, load_categories};
use crate::forms::{FieldErrors, NewsForm, format_datetime_local, parse_datetime_local, parse_id};
use crate::store::{self, NotificationLevel};
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};

/// 新建（`id` 为空）或编辑新闻
#[component]
pub fn NewsEditorPage(id: Option<i64>) -> impl IntoView {
    let app = use_app();
    let router = use_router();

    let viewer = app.auth.get_untracked().user;
    let role = viewer.as_ref().map_or(Role::Reader, |u| u.role);
    let form = RwSignal::new(viewer.as_ref().map(NewsForm::for_new).unwrap_or_default());
    let errors = RwSignal::new(FieldErrors::default());
    let ready = RwSignal::new(id.is_none());

    load_categories(app);
    if role.is_admin() {
        load_agencies(app);
    }
    if let Some(id) = id {
        let client = app.client();
        spawn_local(async move {
            match store::news::fetch_news_by_id(client.as_ref(), &app.news, id).await {
                Ok(news) => {
                    if viewer.as_ref().is_some_and(|u| news.editable_by(u)) {
                        form.set(NewsForm::from_news(&news));
                        ready.set(true);
                    } else {
                        app.notify("You can only edit your own news", NotificationLevel::Warning);
                        router.navigate(AppRoute::NewsDetail(id));
                    }
                }
                Err(e) => app.notify(e.user_message("Failed to fetch news"), NotificationLevel::Error),
            }
        });
    }
    on_cleanup(move || app.news.update(|state| state.clear_current()));

    let saving = move || app.news.with(|state| state.status.loading);
    let categories = move || app.categories.with(|state| state.items.clone());
    let agencies = move || app.agencies.with(|state| state.items.clone());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let draft = form.get_untracked();
        if let Err(field_errors) = draft.validate(role) {
            errors.set(field_errors);
            app.notify("Please fix the highlighted fields", NotificationLevel::Error);
            return;
        }
        errors.set(FieldErrors::default());

        let client = app.client();
        spawn_local(async move {
            let saved = match id {
                None => match draft.to_create_request(role) {
                    Ok(request) => store::news::create_news(client.as_ref(), &app.news, &request).await,
                    Err(field_errors) => return errors.set(field_errors),
                },
                Some(id) => match draft.to_update_request(role) {
                    Ok(patch) => store::news::update_news(client.as_ref(), &app.news, id, patch).await,
                    Err(field_errors) => return errors.set(field_errors),
                },
            };
            match saved {
                Ok(news) => {
                    let verb = if id.is_some() { "updated" } else { "created" };
                    app.notify(format!("News {verb}"), NotificationLevel::Success);
                    router.navigate(AppRoute::NewsDetail(news.id));
                }
                Err(e) => app.notify(e.user_message("Failed to save news"), NotificationLevel::Error),
            }
        });
    };

    let cancel = match id {
        Some(id) => AppRoute::NewsDetail(id),
        None => AppRoute::Home,
    };

    view! {
        <h1 class="text-3xl font-bold mb-6">{if id.is_some() { "Edit news" } else { "Write news" }}</h1>
        <Show when=move || ready.get() fallback=|| view! { <Spinner /> }>
            <form class="card bg-base-100 shadow-xl" on:submit=on_submit>
                <div class="card-body space-y-4">
                    <label class="form-control">
                        <span class="label-text">"Title"</span>
                        <input
                            type="text"
                            class="input input-bordered"
                            prop:value=move || form.with(|f| f.title.clone())
                            on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
                        />
                        <FieldError errors=errors field="title" />
                    </label>
                    <label class="form-control">
                        <span class="label-text">"Content"</span>
                        <textarea
                            class="textarea textarea-bordered h-64"
                            prop:value=move || form.with(|f| f.content.clone())
                            on:input=move |ev| form.update(|f| f.content = event_target_value(&ev))
                        ></textarea>
                        <FieldError errors=errors field="content" />
                    </label>
                    <div class="grid gap-4 md:grid-cols-2">
                        <label class="form-control">
                            <span class="label-text">"Category"</span>
                            <select
                                class="select select-bordered"
                                on:change=move |ev| form.update(|f| f.category_id = parse_id(&event_target_value(&ev)))
                            >
                                <option value="" selected=move || form.with(|f| f.category_id.is_none())>
                                    "Select a category"
                                </option>
                                {move || {
                                    categories()
                                        .into_iter()
                                        .map(|c| {
                                            let selected = move || form.with(|f| f.category_id == Some(c.id));
                                            view! { <option value=c.id.to_string() selected=selected>{c.name}</option> }
                                        })
                                        .collect_view()
                                }}
                            </select>
                            <FieldError errors=errors field="category_id" />
                        </label>
                        <label class="form-control">
                            <span class="label-text">"Publish at (empty keeps it as a draft)"</span>
                            <input
                                type="datetime-local"
                                class="input input-bordered"
                                prop:value=move || {
                                    form.with(|f| f.published_at.as_ref().map(format_datetime_local).unwrap_or_default())
                                }
                                on:change=move |ev| {
                                    form.update(|f| f.published_at = parse_datetime_local(&event_target_value(&ev)))
                                }
                            />
                        </label>
                    </div>
                    <Show when=move || role.is_admin()>
                        <div class="grid gap-4 md:grid-cols-2">
                            <label class="form-control">
                                <span class="label-text">"Author ID"</span>
                                <input
                                    type="number"
                                    min="1"
                                    class="input input-bordered"
                                    prop:value=move || {
                                        form.with(|f| f.author_id.map(|v| v.to_string()).unwrap_or_default())
                                    }
                                    on:input=move |ev| form.update(|f| f.author_id = parse_id(&event_target_value(&ev)))
                                />
                                <FieldError errors=errors field="author_id" />
                            </label>
                            <label class="form-control">
                                <span class="label-text">"Agency"</span>
                                <select
                                    class="select select-bordered"
                                    on:change=move |ev| form.update(|f| f.agency_id = parse_id(&event_target_value(&ev)))
                                >
                                    <option value="" selected=move || form.with(|f| f.agency_id.is_none())>
                                        "Select an agency"
                                    </option>
                                    {move || {
                                        agencies()
                                            .into_iter()
                                            .map(|a| {
                                                let selected = move || form.with(|f| f.agency_id == Some(a.id));
                                                view! { <option value=a.id.to_string() selected=selected>{a.name}</option> }
                                            })
                                            .collect_view()
                                    }}
                                </select>
                                <FieldError errors=errors field="agency_id" />
                            </label>
                        </div>
                    </Show>
                    <div class="card-actions justify-end">
                        <Link to=cancel class="btn btn-ghost">"Cancel"</Link>
                        <button type="submit" class="btn btn-primary" disabled=saving>"Save"</button>
                    </div>
                </div>
            </form>
        </Show>
    }
}
