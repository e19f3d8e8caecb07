use news_desk_shared::{Category, CreateCategoryRequest, UpdateCategoryRequest};

use super::{LoadStatus, Partition, StateCell, remove_by_id, replace_by_id, track, upsert};
use crate::client::Client;
use crate::error::ApiResult;
use crate::web::HttpTransport;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryState {
    pub items: Vec<Category>,
    pub status: LoadStatus,
}

impl Partition for CategoryState {
    fn status_mut(&mut self) -> &mut LoadStatus {
        &mut self.status
    }
}

impl CategoryState {
    pub fn clear_error(&mut self) {
        self.status.clear_error();
    }

    pub fn list_loaded(&mut self, items: &[Category]) {
        self.items = items.to_vec();
    }

    pub fn created(&mut self, category: &Category) {
        upsert(&mut self.items, category);
    }

    pub fn updated(&mut self, category: &Category) {
        replace_by_id(&mut self.items, category);
    }

    pub fn deleted(&mut self, id: i64) {
        remove_by_id(&mut self.items, id);
    }
}

pub async fn fetch_categories<T: HttpTransport, C: StateCell<CategoryState>>(
    client: &Client<T>,
    cell: &C,
) -> ApiResult<Vec<Category>> {
    track(
        &client.policy,
        cell,
        "categories/fetch",
        "Failed to fetch categories",
        client.api.get_categories(),
        |state: &mut CategoryState, items: &Vec<Category>| state.list_loaded(items),
    )
    .await
}

pub async fn create_category<T: HttpTransport, C: StateCell<CategoryState>>(
    client: &Client<T>,
    cell: &C,
    request: &CreateCategoryRequest,
) -> ApiResult<Category> {
    track(
        &client.policy,
        cell,
        "categories/create",
        "Failed to create category",
        client.api.create_category(request),
        CategoryState::created,
    )
    .await
}

pub async fn update_category<T: HttpTransport, C: StateCell<CategoryState>>(
    client: &Client<T>,
    cell: &C,
    id: i64,
    patch: UpdateCategoryRequest,
) -> ApiResult<Category> {
    track(
        &client.policy,
        cell,
        "categories/update",
        "Failed to update category",
        client.api.update_category(id, patch),
        CategoryState::updated,
    )
    .await
}

pub async fn delete_category<T: HttpTransport, C: StateCell<CategoryState>>(
    client: &Client<T>,
    cell: &C,
    id: i64,
) -> ApiResult<i64> {
    track(
        &client.policy,
        cell,
        "categories/delete",
        "Failed to delete category",
        async { client.api.delete_category(id).await.map(|()| id) },
        |state: &mut CategoryState, id: &i64| state.deleted(*id),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{signed_in_client, url};
    use news_desk_shared::protocol::HttpMethod;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn category(id: i64, name: &str) -> Category {
        Category {
            id,
            name: name.to_string(),
        }
    }

    fn cell_with(items: Vec<Category>) -> Rc<RefCell<CategoryState>> {
        Rc::new(RefCell::new(CategoryState {
            items,
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn fetch_replaces_items() {
        let (client, _) = signed_in_client();
        let cell = cell_with(vec![category(1, "Stale")]);
        client.api.transport.mock_response(
            HttpMethod::Get,
            &url("/categories"),
            200,
            json!([{ "id": 2, "name": "Tech" }, { "id": 3, "name": "Sport" }]),
        );

        fetch_categories(&client, &cell).await.unwrap();

        let state = cell.borrow();
        assert_eq!(state.items, vec![category(2, "Tech"), category(3, "Sport")]);
    }

    #[tokio::test]
    async fn duplicate_name_is_a_conflict() {
        let (client, _) = signed_in_client();
        let cell = cell_with(vec![category(1, "Tech")]);
        client.api.transport.mock_response(
            HttpMethod::Post,
            &url("/categories"),
            409,
            json!({ "message": "Category already exists" }),
        );

        let err = create_category(
            &client,
            &cell,
            &CreateCategoryRequest {
                name: "Tech".to_string(),
            },
        )
        .await
        .unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(cell.borrow().items.len(), 1);
        assert_eq!(
            cell.borrow().status.error.as_deref(),
            Some("Category already exists")
        );
    }

    #[tokio::test]
    async fn create_update_delete_cycle() {
        let (client, _) = signed_in_client();
        let cell = cell_with(Vec::new());
        let transport = &client.api.transport;
        transport.mock_response(HttpMethod::Post, &url("/categories"), 201, json!({ "id": 4, "name": "Arts" }));
        transport.mock_response(
            HttpMethod::Patch,
            &url("/categories/4"),
            200,
            json!({ "id": 4, "name": "Culture" }),
        );
        transport.mock_raw(HttpMethod::Delete, &url("/categories/4"), 200, "{}");

        create_category(&client, &cell, &CreateCategoryRequest { name: "Arts".to_string() })
            .await
            .unwrap();
        assert_eq!(cell.borrow().items, vec![category(4, "Arts")]);

        update_category(&client, &cell, 4, UpdateCategoryRequest { name: "Culture".to_string() })
            .await
            .unwrap();
        assert_eq!(cell.borrow().items, vec![category(4, "Culture")]);

        delete_category(&client, &cell, 4).await.unwrap();
        assert!(cell.borrow().items.is_empty());
        assert!(!cell.borrow().status.loading);
    }
}
