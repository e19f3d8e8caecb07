use leptos::prelude::*;

use crate::components::news_list::{
    FilterBar, NewsListing, load_agencies, load_categories, load_news, server_filters,
};
use crate::forms::parse_id;
use crate::listing::AgencyScope;
use crate::use_app;
use crate::web::route::AppRoute;
use crate::web::router::Link;

#[component]
pub fn AgencyNewsPage() -> impl IntoView {
    let app = use_app();
    let page = RwSignal::new(1usize);
    let selected = RwSignal::new(None::<i64>);
    let filters = server_filters(app);

    let scope = Memo::new(move |_| {
        app.auth.with(|state| {
            state
                .user
                .as_ref()
                .map_or(AgencyScope::Denied, |user| AgencyScope::for_viewer(user, selected.get()))
        })
    });

    load_categories(app);
    if matches!(scope.get_untracked(), AgencyScope::Selectable(_)) {
        load_agencies(app);
    }

    Effect::new(move |_| {
        // 未绑定机构的作者不发起请求
        if let Some(agency_id) = scope.get().agency_filter() {
            load_news(app, filters.get().with_agency(agency_id));
        }
    });

    let title = move || match scope.get() {
        AgencyScope::Fixed(id) => app
            .auth
            .with(|state| state.user.as_ref().and_then(|u| u.agency.as_ref()).map(|a| a.name.clone()))
            .unwrap_or_else(|| format!("Agency #{id}")),
        AgencyScope::Selectable(_) | AgencyScope::Unassigned | AgencyScope::Denied => "Agency news".to_string(),
    };
    let agencies = move || app.agencies.with(|state| state.items.clone());

    view! {
        <div class="flex items-center justify-between mb-6">
            <h1 class="text-3xl font-bold">{title}</h1>
            <Link to=AppRoute::NewsEditor(None) class="btn btn-primary">"Write"</Link>
        </div>
        <Show when=move || matches!(scope.get(), AgencyScope::Selectable(_))>
            <select
                class="select select-bordered mb-4"
                on:change=move |ev| {
                    selected.set(parse_id(&event_target_value(&ev)));
                    page.set(1);
                }
            >
                <option value="" selected=move || selected.get().is_none()>"All agencies"</option>
                {move || {
                    agencies()
                        .into_iter()
                        .map(|a| {
                            let is_selected = move || selected.get() == Some(a.id);
                            view! { <option value=a.id.to_string() selected=is_selected>{a.name}</option> }
                        })
                        .collect_view()
                }}
            </select>
        </Show>
        <Show
            when=move || scope.get().agency_filter().is_some()
            fallback=|| {
                view! {
                    <div role="alert" class="alert alert-warning">
                        <span>"Your account is not assigned to an agency yet."</span>
                    </div>
                }
            }
        >
            <FilterBar page=page />
            <NewsListing page=page />
        </Show>
    }
}
