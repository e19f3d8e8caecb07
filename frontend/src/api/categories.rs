use news_desk_shared::protocol::{DeleteCategoryRequest, ListCategoriesRequest, PatchCategoryRequest};
use news_desk_shared::{Category, CreateCategoryRequest, UpdateCategoryRequest};

use super::NewsDeskApi;
use crate::error::ApiResult;
use crate::web::HttpTransport;

impl<T: HttpTransport> NewsDeskApi<T> {
    pub async fn get_categories(&self) -> ApiResult<Vec<Category>> {
        self.execute(&ListCategoriesRequest).await
    }

    pub async fn create_category(&self, category: &CreateCategoryRequest) -> ApiResult<Category> {
        self.execute(category).await
    }

    pub async fn update_category(&self, id: i64, patch: UpdateCategoryRequest) -> ApiResult<Category> {
        self.execute(&PatchCategoryRequest { id, patch }).await
    }

    pub async fn delete_category(&self, id: i64) -> ApiResult<()> {
        self.execute(&DeleteCategoryRequest { id }).await?;
        Ok(())
    }
}
