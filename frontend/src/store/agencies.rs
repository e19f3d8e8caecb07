use news_desk_shared::{Agency, CreateAgencyRequest, UpdateAgencyRequest};

use super::{LoadStatus, Partition, StateCell, drop_current, refresh_current, remove_by_id, replace_by_id, track, upsert};
use crate::client::Client;
use crate::error::ApiResult;
use crate::web::HttpTransport;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AgencyState {
    pub items: Vec<Agency>,
    pub current: Option<Agency>,
    pub status: LoadStatus,
}

impl Partition for AgencyState {
    fn status_mut(&mut self) -> &mut LoadStatus {
        &mut self.status
    }
}

impl AgencyState {
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    pub fn clear_error(&mut self) {
        self.status.clear_error();
    }

    pub fn list_loaded(&mut self, items: &[Agency]) {
        self.items = items.to_vec();
    }

    pub fn one_loaded(&mut self, agency: &Agency) {
        self.current = Some(agency.clone());
    }

    pub fn created(&mut self, agency: &Agency) {
        upsert(&mut self.items, agency);
    }

    pub fn updated(&mut self, agency: &Agency) {
        replace_by_id(&mut self.items, agency);
        refresh_current(&mut self.current, agency);
    }

    pub fn deleted(&mut self, id: i64) {
        remove_by_id(&mut self.items, id);
        drop_current(&mut self.current, id);
    }
}

pub async fn fetch_agencies<T: HttpTransport, C: StateCell<AgencyState>>(
    client: &Client<T>,
    cell: &C,
) -> ApiResult<Vec<Agency>> {
    track(
        &client.policy,
        cell,
        "agencies/fetch",
        "Failed to fetch agencies",
        client.api.get_agencies(),
        |state: &mut AgencyState, items: &Vec<Agency>| state.list_loaded(items),
    )
    .await
}

pub async fn fetch_agency_by_id<T: HttpTransport, C: StateCell<AgencyState>>(
    client: &Client<T>,
    cell: &C,
    id: i64,
) -> ApiResult<Agency> {
    track(
        &client.policy,
        cell,
        "agencies/fetch_one",
        "Failed to fetch agency",
        client.api.get_agency_by_id(id),
        AgencyState::one_loaded,
    )
    .await
}

pub async fn create_agency<T: HttpTransport, C: StateCell<AgencyState>>(
    client: &Client<T>,
    cell: &C,
    request: &CreateAgencyRequest,
) -> ApiResult<Agency> {
    track(
        &client.policy,
        cell,
        "agencies/create",
        "Failed to create agency",
        client.api.create_agency(request),
        AgencyState::created,
    )
    .await
}

pub async fn update_agency<T: HttpTransport, C: StateCell<AgencyState>>(
    client: &Client<T>,
    cell: &C,
    id: i64,
    patch: UpdateAgencyRequest,
) -> ApiResult<Agency> {
    track(
        &client.policy,
        cell,
        "agencies/update",
        "Failed to update agency",
        client.api.update_agency(id, patch),
        AgencyState::updated,
    )
    .await
}

pub async fn delete_agency<T: HttpTransport, C: StateCell<AgencyState>>(
    client: &Client<T>,
    cell: &C,
    id: i64,
) -> ApiResult<i64> {
    track(
        &client.policy,
        cell,
        "agencies/delete",
        "Failed to delete agency",
        async { client.api.delete_agency(id).await.map(|()| id) },
        |state: &mut AgencyState, id: &i64| state.deleted(*id),
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

    fn agency(id: i64, name: &str) -> Agency {
        Agency {
            id,
            name: name.to_string(),
            description: None,
            users: None,
        }
    }

    #[tokio::test]
    async fn fetch_one_with_members() {
        let (client, _) = signed_in_client();
        let cell = Rc::new(RefCell::new(AgencyState::default()));
        client.api.transport.mock_response(
            HttpMethod::Get,
            &url("/agencies/5"),
            200,
            json!({
                "id": 5,
                "name": "Daily Wire",
                "users": [{ "id": 1, "username": "alice", "role": "Author", "agencyId": 5 }]
            }),
        );

        let loaded = fetch_agency_by_id(&client, &cell, 5).await.unwrap();

        assert_eq!(loaded.users.as_ref().map(Vec::len), Some(1));
        assert_eq!(cell.borrow().current, Some(loaded));
    }

    #[tokio::test]
    async fn update_and_delete_track_current() {
        let (client, _) = signed_in_client();
        let cell = Rc::new(RefCell::new(AgencyState {
            items: vec![agency(5, "Daily"), agency(6, "Weekly")],
            current: Some(agency(5, "Daily")),
            ..Default::default()
        }));
        client.api.transport.mock_response(
            HttpMethod::Patch,
            &url("/agencies/5"),
            200,
            json!({ "id": 5, "name": "Daily Wire" }),
        );
        client
            .api
            .transport
            .mock_raw(HttpMethod::Delete, &url("/agencies/5"), 204, "");

        update_agency(
            &client,
            &cell,
            5,
            UpdateAgencyRequest {
                name: Some("Daily Wire".to_string()),
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(cell.borrow().items[0].name, "Daily Wire");
        assert_eq!(cell.borrow().current.as_ref().map(|a| a.name.as_str()), Some("Daily Wire"));

        delete_agency(&client, &cell, 5).await.unwrap();
        assert_eq!(cell.borrow().items, vec![agency(6, "Weekly")]);
        assert_eq!(cell.borrow().current, None);
    }

    #[tokio::test]
    async fn list_failure_keeps_other_partitions_untouched() {
        let (client, _) = signed_in_client();
        let agencies = Rc::new(RefCell::new(AgencyState::default()));
        let news = Rc::new(RefCell::new(crate::store::NewsState::default()));
        client
            .api
            .transport
            .mock_raw(HttpMethod::Get, &url("/agencies"), 500, "");

        assert!(fetch_agencies(&client, &agencies).await.is_err());

        assert_eq!(
            agencies.borrow().status.error.as_deref(),
            Some("Failed to fetch agencies")
        );
        assert_eq!(*news.borrow(), crate::store::NewsState::default());
    }

    #[tokio::test]
    async fn create_appends() {
        let (client, _) = signed_in_client();
        let cell = Rc::new(RefCell::new(AgencyState::default()));
        client.api.transport.mock_response(
            HttpMethod::Post,
            &url("/agencies"),
            201,
            json!({ "id": 7, "name": "Gazette", "description": "Local" }),
        );

        create_agency(
            &client,
            &cell,
            &CreateAgencyRequest {
                name: "Gazette".to_string(),
                description: Some("Local".to_string()),
            },
        )
        .await
        .unwrap();

        assert_eq!(cell.borrow().items.len(), 1);
        cell.borrow_mut().clear_current();
        assert_eq!(cell.borrow().current, None);
    }
}
