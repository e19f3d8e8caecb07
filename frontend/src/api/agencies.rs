use news_desk_shared::protocol::{
    DeleteAgencyRequest, GetAgencyRequest, ListAgenciesRequest, PatchAgencyRequest,
};
use news_desk_shared::{Agency, CreateAgencyRequest, UpdateAgencyRequest};

use super::NewsDeskApi;
use crate::error::ApiResult;
use crate::web::HttpTransport;

impl<T: HttpTransport> NewsDeskApi<T> {
    pub async fn get_agencies(&self) -> ApiResult<Vec<Agency>> {
        self.execute(&ListAgenciesRequest).await
    }

    pub async fn get_agency_by_id(&self, id: i64) -> ApiResult<Agency> {
        self.execute(&GetAgencyRequest { id }).await
    }

    pub async fn create_agency(&self, agency: &CreateAgencyRequest) -> ApiResult<Agency> {
        self.execute(agency).await
    }

    pub async fn update_agency(&self, id: i64, patch: UpdateAgencyRequest) -> ApiResult<Agency> {
        self.execute(&PatchAgencyRequest { id, patch }).await
    }

    pub async fn delete_agency(&self, id: i64) -> ApiResult<()> {
        self.execute(&DeleteAgencyRequest { id }).await?;
        Ok(())
    }
}
