use news_desk_shared::User;
use news_desk_shared::protocol::GetUserRequest;

use super::NewsDeskApi;
use crate::error::ApiResult;
use crate::web::HttpTransport;

impl<T: HttpTransport> NewsDeskApi<T> {
    /// 获取用户资料（令牌中没有 email 等字段）
    pub async fn get_user_by_id(&self, id: i64) -> ApiResult<User> {
        self.execute(&GetUserRequest { id }).await
    }
}
