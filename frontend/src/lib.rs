//! News Desk 前端应用
//!
//! 采用 Context-Driven 的架构：
//! - `api` / `client`: 类型化网关与 401 策略（与 DOM 无关，可在原生环境测试）
//! - `store`: 五个状态分区及其异步操作
//! - `web::route` / `web::guard`: 路由定义与守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `components`: UI 组件层

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod forms;
pub mod listing;
pub mod session;
pub mod store;
pub mod telemetry;

#[cfg(test)]
mod testing;

mod components {
    pub mod admin_categories;
    pub mod agency_news;
    pub mod layout;
    pub mod login;
    pub mod news_detail;
    pub mod news_editor;
    pub mod news_list;
    pub mod profile;
    pub mod register;
}

// 浏览器相关封装：HTTP 传输、本地存储、路由
pub mod web {
    mod http;
    mod storage;

    pub mod guard;
    pub mod route;
    pub mod router;

    pub use http::{FetchTransport, HttpRequest, HttpResponse, HttpTransport, TransportError};
    #[cfg(test)]
    pub use http::MockTransport;
    pub use storage::{KeyValueStorage, LocalStorage, MemoryStorage};
}

use std::sync::Arc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use crate::client::Client;
use crate::components::admin_categories::AdminCategoriesPage;
use crate::components::agency_news::AgencyNewsPage;
use crate::components::layout::{Layout, NotFoundPage};
use crate::components::login::LoginPage;
use crate::components::news_detail::NewsDetailPage;
use crate::components::news_editor::NewsEditorPage;
use crate::components::news_list::HomePage;
use crate::components::profile::ProfilePage;
use crate::components::register::RegisterPage;
use crate::config::ClientConfig;
use crate::store::{AgencyState, AuthState, CategoryState, NewsState, NotificationLevel, UiState};
use crate::web::route::AppRoute;
use crate::web::router::{AppNavigator, RouterOutlet, provide_router};
use crate::web::FetchTransport;

/// 应用上下文：客户端与全部状态分区
///
/// 全部字段都是 arena 句柄，整体可 Copy，便于在视图闭包中捕获。
#[derive(Clone, Copy)]
pub struct AppContext {
    config: StoredValue<ClientConfig>,
    client: StoredValue<Arc<Client<FetchTransport>>>,
    pub auth: RwSignal<AuthState>,
    pub news: RwSignal<NewsState>,
    pub categories: RwSignal<CategoryState>,
    pub agencies: RwSignal<AgencyState>,
    pub ui: RwSignal<UiState>,
}

impl AppContext {
    pub fn client(&self) -> Arc<Client<FetchTransport>> {
        self.client.get_value()
    }

    pub fn page_size(&self) -> usize {
        self.config.with_value(|config| config.page_size)
    }

    /// 显示通知，并在配置的延迟后自动隐藏
    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        let mut serial = 0;
        let message = message.into();
        self.ui.update(|ui| serial = ui.show_notification(message, level));

        let delay = self
            .config
            .with_value(|config| u32::try_from(config.notification_ttl.as_millis()).unwrap_or(u32::MAX));
        let ui = self.ui;
        Timeout::new(delay, move || ui.update(|state| state.hide_if(serial))).forget();
    }
}

/// 从 Context 获取应用上下文
pub fn use_app() -> AppContext {
    use_context::<AppContext>().expect("AppContext should be provided")
}

/// 路由匹配函数
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Home => view! { <Layout><HomePage /></Layout> }.into_any(),
        AppRoute::NewsDetail(id) => view! { <Layout><NewsDetailPage id=id /></Layout> }.into_any(),
        AppRoute::Profile => view! { <Layout><ProfilePage /></Layout> }.into_any(),
        AppRoute::AgencyNews => view! { <Layout><AgencyNewsPage /></Layout> }.into_any(),
        AppRoute::NewsEditor(id) => view! { <Layout><NewsEditorPage id=id /></Layout> }.into_any(),
        AppRoute::AdminCategories => view! { <Layout><AdminCategoriesPage /></Layout> }.into_any(),
        AppRoute::NotFound => view! { <Layout><NotFoundPage /></Layout> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    let config = ClientConfig::from_build_env();

    let auth = RwSignal::new(AuthState::default());
    let viewer = Memo::new(move |_| auth.with(|state| state.user.clone()));

    // 1. 路由服务：注入当前用户信号实现守卫
    let router = provide_router(viewer.into());

    // 2. 客户端：401 时经由导航器同步认证分区并跳转
    let navigator = AppNavigator::new(router, auth);
    let client = Arc::new(Client::browser(&config, navigator));

    // 3. 从持久化令牌恢复会话，然后才对首个路由应用守卫
    store::auth::rehydrate(client.as_ref(), &auth);
    router.start();

    provide_context(AppContext {
        config: StoredValue::new(config),
        client: StoredValue::new(client),
        auth,
        news: RwSignal::new(NewsState::default()),
        categories: RwSignal::new(CategoryState::default()),
        agencies: RwSignal::new(AgencyState::default()),
        ui: RwSignal::new(UiState::default()),
    });

    view! { <RouterOutlet matcher=route_matcher /> }
}
