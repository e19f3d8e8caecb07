//! 状态仓库
//!
//! 五个互相独立的分区（auth / news / categories / agencies / ui），
//! 每个异步操作都经历 pending → fulfilled | rejected 三个阶段：
//! - pending: `loading = true`，清空错误
//! - fulfilled: `loading = false`，按操作合并数据
//! - rejected: `loading = false`，写入错误消息
//!
//! 所有变更都等待服务端确认，不做乐观更新。同一分区上的并发请求不做协调，
//! 最后写入者生效。
//!
//! 分区状态通过 `StateCell` 读写：浏览器中是 Leptos `RwSignal`，测试中是
//! `Rc<RefCell<_>>`。

pub mod agencies;
pub mod auth;
pub mod categories;
pub mod news;
pub mod ui;

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use news_desk_shared::{Agency, Category, News};

use crate::client::SessionPolicy;
use crate::error::ApiResult;

pub use agencies::AgencyState;
pub use auth::AuthState;
pub use categories::CategoryState;
pub use news::NewsState;
pub use ui::{Notification, NotificationLevel, UiState};

// =========================================================
// 状态容器
// =========================================================

/// 可读写的分区状态容器
pub trait StateCell<S> {
    fn update(&self, f: impl FnOnce(&mut S));

    fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R;
}

impl<S> StateCell<S> for Rc<RefCell<S>> {
    fn update(&self, f: impl FnOnce(&mut S)) {
        f(&mut self.borrow_mut());
    }

    fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.borrow())
    }
}

impl<S: Send + Sync + 'static> StateCell<S> for leptos::prelude::RwSignal<S> {
    fn update(&self, f: impl FnOnce(&mut S)) {
        leptos::prelude::Update::update(self, f);
    }

    fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        leptos::prelude::WithUntracked::with_untracked(self, f)
    }
}

// =========================================================
// 加载状态
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadStatus {
    pub loading: bool,
    pub error: Option<String>,
}

impl LoadStatus {
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn succeed(&mut self) {
        self.loading = false;
    }

    pub fn fail(&mut self, message: String) {
        self.loading = false;
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}

/// 带加载状态的分区
pub trait Partition {
    fn status_mut(&mut self) -> &mut LoadStatus;
}

/// 执行一次分区操作的三个阶段，并把网关结果原样返回给调用方
pub(crate) async fn track<S, C, T, Fut>(
    policy: &SessionPolicy,
    cell: &C,
    operation: &'static str,
    fallback: &str,
    request: Fut,
    apply: impl FnOnce(&mut S, &T),
) -> ApiResult<T>
where
    S: Partition,
    C: StateCell<S>,
    Fut: Future<Output = ApiResult<T>>,
{
    cell.update(|state| state.status_mut().begin());

    let result = policy.settle(request.await);

    match &result {
        Ok(value) => cell.update(|state| {
            state.status_mut().succeed();
            apply(state, value);
        }),
        Err(error) => {
            tracing::warn!(operation, error = %error, "store operation rejected");
            let message = error.user_message(fallback);
            cell.update(|state| state.status_mut().fail(message));
        }
    }

    result
}

// =========================================================
// 集合合并
// =========================================================

/// 以 id 标识的实体
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for News {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Category {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Agency {
    fn id(&self) -> i64 {
        self.id
    }
}

/// 追加新实体；已存在同 id 时替换，保证只出现一次
pub fn upsert<T: Identified + Clone>(items: &mut Vec<T>, item: &T) {
    match items.iter_mut().find(|existing| existing.id() == item.id()) {
        Some(existing) => *existing = item.clone(),
        None => items.push(item.clone()),
    }
}

/// 替换同 id 的实体；不存在时不插入
pub fn replace_by_id<T: Identified + Clone>(items: &mut [T], item: &T) {
    if let Some(existing) = items.iter_mut().find(|existing| existing.id() == item.id()) {
        *existing = item.clone();
    }
}

pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: i64) {
    items.retain(|item| item.id() != id);
}

/// 替换“当前”槽位中同 id 的实体
pub fn refresh_current<T: Identified + Clone>(current: &mut Option<T>, item: &T) {
    if current.as_ref().is_some_and(|c| c.id() == item.id()) {
        *current = Some(item.clone());
    }
}

/// 清除“当前”槽位中同 id 的实体
pub fn drop_current<T: Identified>(current: &mut Option<T>, id: i64) {
    if current.as_ref().is_some_and(|c| c.id() == id) {
        *current = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::news;

    #[test]
    fn upsert_never_duplicates() {
        let mut items = vec![news(1, "a")];
        upsert(&mut items, &news(2, "b"));
        upsert(&mut items, &news(2, "b2"));
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].title, "b2");
    }

    #[test]
    fn replace_ignores_unknown_ids() {
        let mut items = vec![news(1, "a")];
        replace_by_id(&mut items, &news(9, "x"));
        assert_eq!(items, vec![news(1, "a")]);
    }

    #[test]
    fn current_slot_follows_identity() {
        let mut current = Some(news(1, "a"));
        refresh_current(&mut current, &news(2, "b"));
        assert_eq!(current.as_ref().unwrap().title, "a");
        refresh_current(&mut current, &news(1, "a2"));
        assert_eq!(current.as_ref().unwrap().title, "a2");
        drop_current(&mut current, 2);
        assert!(current.is_some());
        drop_current(&mut current, 1);
        assert!(current.is_none());
    }

    #[test]
    fn load_status_phases() {
        let mut status = LoadStatus {
            loading: false,
            error: Some("old".to_string()),
        };
        status.begin();
        assert!(status.loading);
        assert_eq!(status.error, None);
        status.fail("boom".to_string());
        assert!(!status.loading);
        assert_eq!(status.error.as_deref(), Some("boom"));
    }
}
