use news_desk_shared::protocol::{DeleteNewsRequest, GetNewsRequest, ListNewsRequest, PatchNewsRequest};
use news_desk_shared::{CreateNewsRequest, News, NewsFilters, UpdateNewsRequest};

use super::NewsDeskApi;
use crate::error::ApiResult;
use crate::web::HttpTransport;

impl<T: HttpTransport> NewsDeskApi<T> {
    /// 获取新闻列表，只发送显式设置的过滤条件
    pub async fn get_news(&self, filters: &NewsFilters) -> ApiResult<Vec<News>> {
        self.execute(&ListNewsRequest {
            filters: filters.clone(),
        })
        .await
    }

    pub async fn get_news_by_id(&self, id: i64) -> ApiResult<News> {
        self.execute(&GetNewsRequest { id }).await
    }

    pub async fn create_news(&self, news: &CreateNewsRequest) -> ApiResult<News> {
        self.execute(news).await
    }

    pub async fn update_news(&self, id: i64, patch: UpdateNewsRequest) -> ApiResult<News> {
        self.execute(&PatchNewsRequest { id, patch }).await
    }

    pub async fn delete_news(&self, id: i64) -> ApiResult<()> {
        self.execute(&DeleteNewsRequest { id }).await?;
        Ok(())
    }
}
