//! 路由服务模块 - 核心引擎
//!
//! 封装 web_sys 的 History API，所有对 window.history 的操作都集中在此模块。
//! 每次导航、后退/前进以及认证状态变化都经过 `guard::guard`。

use std::sync::Arc;

use leptos::prelude::*;
use news_desk_shared::User;
use wasm_bindgen::prelude::*;

use super::guard::{GuardDecision, after_login_target, forced_login, guard};
use super::route::AppRoute;
use crate::client::Navigator;
use crate::store::AuthState;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn write_history(path: &str, use_push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = if use_push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if result.is_err() {
        tracing::warn!(path, "history update failed");
    }
}

/// 路由器服务
///
/// 通过 Signal 驱动界面更新；当前用户以注入的信号提供，与认证存储解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    /// 当前用户（`None` 为未登录）
    viewer: Signal<Option<User>>,
    /// 被拦截的原目标，登录后返回
    return_to: RwSignal<Option<AppRoute>>,
}

impl RouterService {
    fn new(viewer: Signal<Option<User>>) -> Self {
        let (current_route, set_route) = signal(AppRoute::from_path(&current_path()));
        Self {
            current_route,
            set_route,
            viewer,
            return_to: RwSignal::new(None),
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    pub fn navigate(&self, route: AppRoute) {
        self.navigate_to_route(route, true);
    }

    /// 应用守卫，返回实际应进入的路由
    fn resolve(&self, target: AppRoute) -> AppRoute {
        let viewer = self.viewer.get_untracked();

        let target = match viewer {
            Some(_) => match after_login_target(target, self.return_to.get_untracked()) {
                Some(next) => {
                    self.return_to.set(None);
                    next
                }
                None => target,
            },
            None => target,
        };

        match guard(target, viewer.as_ref()) {
            GuardDecision::Allow => target,
            GuardDecision::RedirectToLogin { return_to } => {
                tracing::info!(route = %return_to, "access denied, redirecting to login");
                self.return_to.set(Some(return_to));
                AppRoute::auth_failure_redirect()
            }
            GuardDecision::RedirectTo(route) => {
                tracing::info!(route = %target, redirect = %route, "role not permitted");
                route
            }
        }
    }

    /// `use_push` 为 false 时使用 replaceState
    fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        self.commit(target, &target.to_path(), use_push);
    }

    /// 按地址栏路径导航，未知路径保留原样
    fn navigate_to_path(&self, path: &str, use_push: bool) {
        self.commit(AppRoute::from_path(path), path, use_push);
    }

    fn commit(&self, target: AppRoute, requested: &str, use_push: bool) {
        let resolved = self.resolve(target);
        write_history(&resolved.location(requested), use_push);
        self.set_route.set(resolved);
    }

    /// 会话失效：记住当前页面并进入登录页
    pub fn force_login(&self) {
        let transition = forced_login(self.current_route.get_untracked());
        if let Some(route) = transition.return_to {
            self.return_to.set(Some(route));
        }
        let login = AppRoute::auth_failure_redirect();
        write_history(&login.to_path(), transition.push);
        self.set_route.set(login);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;
        let closure = Closure::<dyn Fn()>::new(move || {
            router.navigate_to_path(&current_path(), false);
        });

        if let Some(window) = web_sys::window() {
            let _ = window.add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时重新检查当前路由
    fn setup_auth_redirect(&self) {
        let router = *self;
        Effect::new(move |_| {
            let signed_in = router.viewer.with(Option::is_some);
            let route = router.current_route.get_untracked();
            let resolved = router.resolve(route);
            if resolved != route {
                tracing::info!(signed_in, from = %route, to = %resolved, "auth state changed, rerouting");
                write_history(&resolved.to_path(), false);
                router.set_route.set(resolved);
            }
        });
    }
}

impl RouterService {
    /// 会话恢复之后调用：对首个路由应用守卫并开始监听
    pub fn start(&self) {
        self.navigate_to_path(&current_path(), false);
        self.init_popstate_listener();
        self.setup_auth_redirect();
    }
}

/// 提供路由服务到 Context
pub fn provide_router(viewer: Signal<Option<User>>) -> RouterService {
    let router = RouterService::new(viewer);
    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>().expect("RouterService not found in context. Ensure provide_router was called.")
}

/// 401 时由 `SessionPolicy` 调用：同步认证分区并跳转登录页
pub struct AppNavigator {
    router: RouterService,
    auth: RwSignal<AuthState>,
}

impl AppNavigator {
    pub fn new(router: RouterService, auth: RwSignal<AuthState>) -> Arc<Self> {
        Arc::new(Self { router, auth })
    }
}

impl Navigator for AppNavigator {
    fn force_login(&self) {
        self.auth.update(AuthState::signed_out);
        self.router.force_login();
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由出口组件
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || matcher(router.current_route().get())
}

/// 应用内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        router.navigate(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}
