use news_desk_shared::{CreateNewsRequest, News, NewsFilters, UpdateNewsRequest};

use super::{LoadStatus, Partition, StateCell, drop_current, refresh_current, remove_by_id, replace_by_id, track, upsert};
use crate::client::Client;
use crate::error::ApiResult;
use crate::web::HttpTransport;

/// 新闻分区
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsState {
    pub items: Vec<News>,
    pub current: Option<News>,
    pub filters: NewsFilters,
    pub status: LoadStatus,
}

impl Partition for NewsState {
    fn status_mut(&mut self) -> &mut LoadStatus {
        &mut self.status
    }
}

impl NewsState {
    pub fn set_filters(&mut self, filters: NewsFilters) {
        self.filters = filters;
    }

    /// 清空全部筛选条件（含搜索词）
    pub fn reset_filters(&mut self) {
        self.filters = NewsFilters::default();
    }

    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn clear_error(&mut self) {
        self.status.clear_error();
    }

    /// 列表整体替换，不累加
    pub fn list_loaded(&mut self, items: &[News]) {
        self.items = items.to_vec();
    }

    pub fn one_loaded(&mut self, news: &News) {
        self.current = Some(news.clone());
    }

    pub fn created(&mut self, news: &News) {
        upsert(&mut self.items, news);
    }

    pub fn updated(&mut self, news: &News) {
        replace_by_id(&mut self.items, news);
        refresh_current(&mut self.current, news);
    }

    pub fn deleted(&mut self, id: i64) {
        remove_by_id(&mut self.items, id);
        drop_current(&mut self.current, id);
    }
}

pub async fn fetch_news<T: HttpTransport, C: StateCell<NewsState>>(
    client: &Client<T>,
    cell: &C,
    filters: &NewsFilters,
) -> ApiResult<Vec<News>> {
    track(
        &client.policy,
        cell,
        "news/fetch",
        "Failed to fetch news",
        client.api.get_news(filters),
        |state: &mut NewsState, items: &Vec<News>| state.list_loaded(items),
    )
    .await
}

pub async fn fetch_news_by_id<T: HttpTransport, C: StateCell<NewsState>>(
    client: &Client<T>,
    cell: &C,
    id: i64,
) -> ApiResult<News> {
    track(
        &client.policy,
        cell,
        "news/fetch_one",
        "Failed to fetch news",
        client.api.get_news_by_id(id),
        NewsState::one_loaded,
    )
    .await
}

pub async fn create_news<T: HttpTransport, C: StateCell<NewsState>>(
    client: &Client<T>,
    cell: &C,
    request: &CreateNewsRequest,
) -> ApiResult<News> {
    track(
        &client.policy,
        cell,
        "news/create",
        "Failed to create news",
        client.api.create_news(request),
        NewsState::created,
    )
    .await
}

pub async fn update_news<T: HttpTransport, C: StateCell<NewsState>>(
    client: &Client<T>,
    cell: &C,
    id: i64,
    patch: UpdateNewsRequest,
) -> ApiResult<News> {
    track(
        &client.policy,
        cell,
        "news/update",
        "Failed to update news",
        client.api.update_news(id, patch),
        NewsState::updated,
    )
    .await
}

pub async fn delete_news<T: HttpTransport, C: StateCell<NewsState>>(
    client: &Client<T>,
    cell: &C,
    id: i64,
) -> ApiResult<i64> {
    track(
        &client.policy,
        cell,
        "news/delete",
        "Failed to delete news",
        async { client.api.delete_news(id).await.map(|()| id) },
        |state: &mut NewsState, id: &i64| state.deleted(*id),
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{news, news_json, signed_in_client, url};
    use news_desk_shared::protocol::HttpMethod;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn cell_with(items: Vec<News>, current: Option<News>) -> Rc<RefCell<NewsState>> {
        Rc::new(RefCell::new(NewsState {
            items,
            current,
            ..Default::default()
        }))
    }

    #[tokio::test]
    async fn fetch_replaces_collection_exactly() {
        let (client, _) = signed_in_client();
        let cell = cell_with(vec![news(1, "old"), news(2, "old")], None);
        client.api.transport.mock_response(
            HttpMethod::Get,
            &url("/news"),
            200,
            json!([news_json(3, "fresh")]),
        );

        fetch_news(&client, &cell, &NewsFilters::default()).await.unwrap();

        let state = cell.borrow();
        assert_eq!(state.items, vec![news(3, "fresh")]);
        assert!(!state.status.loading);
        assert_eq!(state.status.error, None);
    }

    #[tokio::test]
    async fn fetch_failure_keeps_items_and_records_message() {
        let (client, _) = signed_in_client();
        let cell = cell_with(vec![news(1, "kept")], None);
        client.api.transport.mock_response(
            HttpMethod::Get,
            &url("/news"),
            500,
            json!({ "message": "database down" }),
        );

        assert!(fetch_news(&client, &cell, &NewsFilters::default()).await.is_err());

        let state = cell.borrow();
        assert_eq!(state.items, vec![news(1, "kept")]);
        assert!(!state.status.loading);
        assert_eq!(state.status.error.as_deref(), Some("database down"));
    }

    #[tokio::test]
    async fn fetch_failure_without_message_uses_fallback() {
        let (client, _) = signed_in_client();
        let cell = cell_with(Vec::new(), None);
        client
            .api
            .transport
            .mock_raw(HttpMethod::Get, &url("/news"), 502, "Bad Gateway");

        let _ = fetch_news(&client, &cell, &NewsFilters::default()).await;

        assert_eq!(cell.borrow().status.error.as_deref(), Some("Failed to fetch news"));
    }

    #[tokio::test]
    async fn fetch_one_sets_current() {
        let (client, _) = signed_in_client();
        let cell = cell_with(Vec::new(), None);
        client
            .api
            .transport
            .mock_response(HttpMethod::Get, &url("/news/4"), 200, news_json(4, "four"));

        fetch_news_by_id(&client, &cell, 4).await.unwrap();

        assert_eq!(cell.borrow().current, Some(news(4, "four")));
    }

    #[tokio::test]
    async fn create_appends_once() {
        let (client, _) = signed_in_client();
        let cell = cell_with(vec![news(1, "a")], None);
        client
            .api
            .transport
            .mock_response(HttpMethod::Post, &url("/news"), 201, news_json(2, "b"));

        let request = CreateNewsRequest {
            title: "b".to_string(),
            content: "b body".to_string(),
            published_at: None,
            category_id: 3,
            author_id: None,
            agency_id: None,
        };
        let created = create_news(&client, &cell, &request).await.unwrap();

        let state = cell.borrow();
        assert_eq!(state.items.len(), 2);
        assert_eq!(state.items.iter().filter(|n| n.id == created.id).count(), 1);
    }

    #[tokio::test]
    async fn update_replaces_list_entry_and_current() {
        let (client, _) = signed_in_client();
        let cell = cell_with(vec![news(1, "a"), news(2, "b")], Some(news(2, "b")));
        client
            .api
            .transport
            .mock_response(HttpMethod::Patch, &url("/news/2"), 200, news_json(2, "b2"));

        update_news(
            &client,
            &cell,
            2,
            UpdateNewsRequest {
                title: Some("b2".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let state = cell.borrow();
        assert_eq!(state.items[1], news(2, "b2"));
        assert_eq!(state.current, Some(news(2, "b2")));
    }

    #[tokio::test]
    async fn update_leaves_unrelated_current_alone() {
        let (client, _) = signed_in_client();
        let cell = cell_with(vec![news(1, "a")], Some(news(9, "other")));
        client
            .api
            .transport
            .mock_response(HttpMethod::Patch, &url("/news/1"), 200, news_json(1, "a2"));

        update_news(&client, &cell, 1, UpdateNewsRequest::default())
            .await
            .unwrap();

        assert_eq!(cell.borrow().current, Some(news(9, "other")));
    }

    #[tokio::test]
    async fn delete_removes_everywhere() {
        let (client, _) = signed_in_client();
        let cell = cell_with(vec![news(1, "a"), news(2, "b")], Some(news(2, "b")));
        client
            .api
            .transport
            .mock_raw(HttpMethod::Delete, &url("/news/2"), 204, "");

        assert_eq!(delete_news(&client, &cell, 2).await, Ok(2));

        let state = cell.borrow();
        assert!(state.items.iter().all(|n| n.id != 2));
        assert_eq!(state.current, None);
    }

    #[tokio::test]
    async fn failed_delete_changes_nothing_but_status() {
        let (client, _) = signed_in_client();
        let cell = cell_with(vec![news(1, "a")], None);
        client.api.transport.mock_response(
            HttpMethod::Delete,
            &url("/news/1"),
            403,
            json!({ "message": "Forbidden" }),
        );

        assert!(delete_news(&client, &cell, 1).await.is_err());
        assert_eq!(cell.borrow().items.len(), 1);
        assert_eq!(cell.borrow().status.error.as_deref(), Some("Forbidden"));
    }

    #[tokio::test]
    async fn unauthorized_fetch_forces_login_and_still_fails() {
        let (client, navigator) = signed_in_client();
        let cell = cell_with(Vec::new(), None);
        client
            .api
            .transport
            .mock_response(HttpMethod::Get, &url("/news"), 401, json!({}));

        let result = fetch_news(&client, &cell, &NewsFilters::default()).await;

        assert!(result.unwrap_err().is_unauthorized());
        assert!(!client.session().is_authenticated());
        assert_eq!(client.session().stored_token(), None);
        assert_eq!(navigator.redirects(), 1);
    }

    #[test]
    fn reducers_without_network() {
        let mut state = NewsState {
            current: Some(news(1, "a")),
            status: LoadStatus {
                loading: false,
                error: Some("x".to_string()),
            },
            ..Default::default()
        };
        state.set_filters(NewsFilters {
            category_id: Some(2),
            ..Default::default()
        });
        state.clear_current();
        state.clear_error();
        assert_eq!(state.filters.category_id, Some(2));
        assert_eq!(state.current, None);
        assert_eq!(state.status.error, None);
    }

    #[test]
    fn reset_clears_every_filter() {
        let mut state = NewsState::default();
        state.set_filters(NewsFilters {
            category_id: Some(2),
            agency_id: Some(5),
            search_term: Some("vote".to_string()),
            ..Default::default()
        });
        state.reset_filters();
        assert_eq!(state.filters, NewsFilters::default());
    }

    #[tokio::test]
    async fn agency_filter_is_sent_to_the_server() {
        let (client, _) = signed_in_client();
        let cell = cell_with(Vec::new(), None);
        client
            .api
            .transport
            .mock_response(HttpMethod::Get, &url("/news"), 200, json!([news_json(1, "a")]));

        let filters = NewsFilters {
            agency_id: Some(5),
            ..Default::default()
        };
        fetch_news(&client, &cell, &filters).await.unwrap();

        let req = client.api.transport.last_request().unwrap();
        assert_eq!(req.query, vec![("agencyId".to_string(), "5".to_string())]);
    }
}
