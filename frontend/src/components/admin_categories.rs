use leptos::prelude::*;
use leptos::task::spawn_local;
use news_desk_shared::Category;

use crate::components::layout::{ErrorAlert, Spinner};
use crate::components::login::FieldError;
use crate::components::news_list::load_categories;
use crate::error::ApiError;
use crate::forms::{CATEGORY_CONFLICT_MESSAGE, CategoryForm, FieldErrors};
use crate::store::{self, NotificationLevel};
use crate::{AppContext, use_app};

/// 409 显示在输入框下方，其余错误走通知
fn report_failure(app: AppContext, errors: RwSignal<FieldErrors>, error: &ApiError, fallback: &str) {
    if error.is_conflict() {
        errors.update(|e| e.insert("name", CATEGORY_CONFLICT_MESSAGE));
    } else {
        app.notify(error.user_message(fallback), NotificationLevel::Error);
    }
}

#[component]
pub fn AdminCategoriesPage() -> impl IntoView {
    let app = use_app();

    let new_name = RwSignal::new(String::new());
    let create_errors = RwSignal::new(FieldErrors::default());
    let editing = RwSignal::new(None::<i64>);

    load_categories(app);

    let loading = move || app.categories.with(|state| state.status.loading && state.items.is_empty());
    let error = Signal::derive(move || app.categories.with(|state| state.status.error.clone()));
    let items = move || app.categories.with(|state| state.items.clone());

    let on_create = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();

        let form = CategoryForm {
            name: new_name.get_untracked(),
        };
        let request = match form.to_create_request() {
            Ok(request) => request,
            Err(field_errors) => return create_errors.set(field_errors),
        };
        create_errors.set(FieldErrors::default());

        let client = app.client();
        spawn_local(async move {
            match store::categories::create_category(client.as_ref(), &app.categories, &request).await {
                Ok(category) => {
                    new_name.set(String::new());
                    app.notify(format!("Category \"{}\" created", category.name), NotificationLevel::Success);
                }
                Err(e) => report_failure(app, create_errors, &e, "Failed to create category"),
            }
        });
    };

    view! {
        <h1 class="text-3xl font-bold mb-6">"Categories"</h1>
        <ErrorAlert message=error />
        <form class="flex gap-2 items-start mb-6" on:submit=on_create>
            <label class="form-control flex-1">
                <input
                    type="text"
                    class="input input-bordered"
                    placeholder="New category name"
                    prop:value=new_name
                    on:input=move |ev| new_name.set(event_target_value(&ev))
                />
                <FieldError errors=create_errors field="name" />
            </label>
            <button type="submit" class="btn btn-primary">"Add"</button>
        </form>
        <Show when=move || !loading() fallback=|| view! { <Spinner /> }>
            <div class="overflow-x-auto">
                <table class="table">
                    <thead>
                        <tr>
                            <th>"ID"</th>
                            <th>"Name"</th>
                            <th></th>
                        </tr>
                    </thead>
                    <tbody>
                        <For each=items key=|c| (c.id, c.name.clone()) let:category>
                            <CategoryRow category=category editing=editing />
                        </For>
                    </tbody>
                </table>
            </div>
        </Show>
    }
}

#[component]
fn CategoryRow(category: Category, editing: RwSignal<Option<i64>>) -> impl IntoView {
    let app = use_app();
    let id = category.id;
    let draft = RwSignal::new(category.name.clone());
    let errors = RwSignal::new(FieldErrors::default());
    let original = category.name.clone();

    let start_edit = move |_| {
        draft.set(original.clone());
        errors.set(FieldErrors::default());
        editing.set(Some(id));
    };

    let save = move |_| {
        let form = CategoryForm {
            name: draft.get_untracked(),
        };
        let patch = match form.to_update_request() {
            Ok(patch) => patch,
            Err(field_errors) => return errors.set(field_errors),
        };
        errors.set(FieldErrors::default());

        let client = app.client();
        spawn_local(async move {
            match store::categories::update_category(client.as_ref(), &app.categories, id, patch).await {
                Ok(_) => {
                    editing.set(None);
                    app.notify("Category updated", NotificationLevel::Success);
                }
                Err(e) => report_failure(app, errors, &e, "Failed to update category"),
            }
        });
    };

    let delete = move |_| {
        let client = app.client();
        spawn_local(async move {
            match store::categories::delete_category(client.as_ref(), &app.categories, id).await {
                Ok(_) => app.notify("Category deleted", NotificationLevel::Success),
                Err(e) => app.notify(e.user_message("Failed to delete category"), NotificationLevel::Error),
            }
        });
    };

    let is_editing = move || editing.get() == Some(id);
    let name = category.name;

    view! {
        <tr>
            <td>{id}</td>
            <td>
                <Show when=is_editing fallback=move || name.clone()>
                    <input
                        type="text"
                        class="input input-bordered input-sm"
                        prop:value=draft
                        on:input=move |ev| draft.set(event_target_value(&ev))
                    />
                    <FieldError errors=errors field="name" />
                </Show>
            </td>
            <td class="flex gap-2 justify-end">
                <Show
                    when=is_editing
                    fallback=move || {
                        view! {
                            <button class="btn btn-sm" on:click=start_edit.clone()>"Edit"</button>
                            <button class="btn btn-sm btn-error btn-outline" on:click=delete>"Delete"</button>
                        }
                    }
                >
                    <button class="btn btn-sm btn-primary" on:click=save>"Save"</button>
                    <button class="btn btn-sm btn-ghost" on:click=move |_| editing.set(None)>"Cancel"</button>
                </Show>
            </td>
        </tr>
    }
}
