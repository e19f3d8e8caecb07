use leptos::prelude::*;
use leptos::task::spawn_local;
use news_desk_shared::{News, NewsFilters};

use crate::components::layout::{ErrorAlert, Spinner};
use crate::forms::parse_id;
use crate::listing::{apply_search, page_count, page_slice};
use crate::store;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use crate::{AppContext, use_app};

/// 发往服务端的筛选条件（不含搜索词），用于触发重新加载
pub fn server_filters(app: AppContext) -> Memo<NewsFilters> {
    Memo::new(move |_| {
        app.news.with(|state| NewsFilters {
            search_term: None,
            ..state.filters.clone()
        })
    })
}

pub fn load_news(app: AppContext, filters: NewsFilters) {
    let client = app.client();
    spawn_local(async move {
        let _ = store::news::fetch_news(client.as_ref(), &app.news, &filters).await;
    });
}

pub fn load_categories(app: AppContext) {
    let client = app.client();
    spawn_local(async move {
        let _ = store::categories::fetch_categories(client.as_ref(), &app.categories).await;
    });
}

pub fn load_agencies(app: AppContext) {
    let client = app.client();
    spawn_local(async move {
        let _ = store::agencies::fetch_agencies(client.as_ref(), &app.agencies).await;
    });
}

/// 修改筛选条件并回到第一页
fn edit_filters(app: AppContext, page: RwSignal<usize>, edit: impl FnOnce(&mut NewsFilters)) {
    app.news.update(|state| {
        let mut filters = state.filters.clone();
        edit(&mut filters);
        state.set_filters(filters);
    });
    page.set(1);
}

#[component]
pub fn HomePage() -> impl IntoView {
    let app = use_app();
    let page = RwSignal::new(1usize);
    let filters = server_filters(app);

    load_categories(app);
    load_agencies(app);
    Effect::new(move |_| load_news(app, filters.get()));

    view! {
        <h1 class="text-3xl font-bold mb-6">"Latest news"</h1>
        <FilterBar page=page agency_select=true />
        <NewsListing page=page />
    }
}

/// 筛选栏；`agency_select` 为 false 时机构由页面自身决定
#[component]
pub fn FilterBar(page: RwSignal<usize>, #[prop(optional)] agency_select: bool) -> impl IntoView {
    let app = use_app();
    let categories = move || app.categories.with(|state| state.items.clone());
    let agencies = move || app.agencies.with(|state| state.items.clone());
    let current = move || app.news.with(|state| state.filters.clone());

    let on_reset = move |_| {
        app.news.update(|state| state.reset_filters());
        page.set(1);
    };

    view! {
        <div class="card bg-base-100 shadow mb-6">
            <div class="card-body grid gap-4 md:grid-cols-3 lg:grid-cols-6">
                <input
                    type="search"
                    class="input input-bordered"
                    placeholder="Search"
                    prop:value=move || current().search_term.unwrap_or_default()
                    on:input=move |ev| {
                        let term = event_target_value(&ev);
                        edit_filters(app, page, |f| f.search_term = Some(term).filter(|t| !t.is_empty()));
                    }
                />
                <select
                    class="select select-bordered"
                    on:change=move |ev| {
                        let id = parse_id(&event_target_value(&ev));
                        edit_filters(app, page, |f| f.category_id = id);
                    }
                >
                    <option value="" selected=move || current().category_id.is_none()>"All categories"</option>
                    {move || {
                        categories()
                            .into_iter()
                            .map(|c| {
                                let selected = move || current().category_id == Some(c.id);
                                view! { <option value=c.id.to_string() selected=selected>{c.name}</option> }
                            })
                            .collect_view()
                    }}
                </select>
                <Show when=move || agency_select>
                    <select
                        class="select select-bordered"
                        on:change=move |ev| {
                            let id = parse_id(&event_target_value(&ev));
                            edit_filters(app, page, |f| f.agency_id = id);
                        }
                    >
                        <option value="" selected=move || current().agency_id.is_none()>"All agencies"</option>
                        {move || {
                            agencies()
                                .into_iter()
                                .map(|a| {
                                    let selected = move || current().agency_id == Some(a.id);
                                    view! { <option value=a.id.to_string() selected=selected>{a.name}</option> }
                                })
                                .collect_view()
                        }}
                    </select>
                </Show>
                <input
                    type="date"
                    class="input input-bordered"
                    prop:value=move || current().start_date.map(|d| d.to_string()).unwrap_or_default()
                    on:change=move |ev| {
                        let date = event_target_value(&ev).parse().ok();
                        edit_filters(app, page, |f| f.start_date = date);
                    }
                />
                <input
                    type="date"
                    class="input input-bordered"
                    prop:value=move || current().end_date.map(|d| d.to_string()).unwrap_or_default()
                    on:change=move |ev| {
                        let date = event_target_value(&ev).parse().ok();
                        edit_filters(app, page, |f| f.end_date = date);
                    }
                />
                <button class="btn btn-ghost" on:click=on_reset>"Reset"</button>
            </div>
        </div>
    }
}

/// 新闻分区的列表视图：搜索词过滤 + 客户端分页
#[component]
pub fn NewsListing(page: RwSignal<usize>) -> impl IntoView {
    let app = use_app();
    let page_size = app.page_size();

    let visible = Memo::new(move |_| {
        app.news.with(|state| {
            apply_search(&state.items, state.filters.search_term.as_deref())
                .into_iter()
                .cloned()
                .collect::<Vec<News>>()
        })
    });
    let total = Signal::derive(move || visible.with(Vec::len));
    let loading = move || app.news.with(|state| state.status.loading);
    let error = Signal::derive(move || app.news.with(|state| state.status.error.clone()));

    view! {
        <ErrorAlert message=error />
        <Show when=move || !loading() fallback=|| view! { <Spinner /> }>
            <Show
                when=move || { total.get() > 0 }
                fallback=|| view! { <p class="text-center opacity-60 py-12">"No news found"</p> }
            >
                <div class="grid gap-6 md:grid-cols-2 lg:grid-cols-3">
                    {move || {
                        visible.with(|items| {
                            page_slice(items, page.get(), page_size)
                                .iter()
                                .cloned()
                                .map(|news| view! { <NewsCard news=news /> })
                                .collect_view()
                        })
                    }}
                </div>
                <Pagination total=total page=page page_size=page_size />
            </Show>
        </Show>
    }
}

#[component]
pub fn NewsCard(news: News) -> impl IntoView {
    let excerpt: String = news.content.chars().take(160).collect();
    let category = news.category.as_ref().map(|c| c.name.clone());
    let published = news
        .published_at
        .map(|at| at.format("%Y-%m-%d %H:%M").to_string());
    let is_draft = news.is_draft();
    let route = AppRoute::NewsDetail(news.id);

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h2 class="card-title">
                    {news.title}
                    <Show when=move || is_draft>
                        <span class="badge badge-warning">"Draft"</span>
                    </Show>
                </h2>
                <p class="text-sm opacity-70">
                    {category.unwrap_or_default()} " " {published.unwrap_or_default()}
                </p>
                <p>{excerpt}</p>
                <div class="card-actions justify-end">
                    <Link to=route class="btn btn-primary btn-sm">"Read"</Link>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn Pagination(total: Signal<usize>, page: RwSignal<usize>, page_size: usize) -> impl IntoView {
    let pages = move || page_count(total.get(), page_size);

    view! {
        <Show when=move || { pages() > 1 }>
            <div class="join flex justify-center mt-8">
                {move || {
                    (1..=pages())
                        .map(|n| {
                            let class = move || {
                                if page.get() == n { "join-item btn btn-active" } else { "join-item btn" }
                            };
                            view! {
                                <button class=class on:click=move |_| page.set(n)>
                                    {n}
                                </button>
                            }
                        })
                        .collect_view()
                }}
            </div>
        </Show>
    }
}
