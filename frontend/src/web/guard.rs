//! 路由守卫
//!
//! 纯函数：只依据是否登录、用户角色和路由的访问要求做决定，不发起请求。

use news_desk_shared::User;

use super::route::{AppRoute, RouteAccess};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// 未登录：去登录页，并记住原目标
    RedirectToLogin { return_to: AppRoute },
    /// 已登录但无权访问，或已登录访问登录页
    RedirectTo(AppRoute),
}

/// `viewer` 为 `None` 表示未登录
pub fn guard(route: AppRoute, viewer: Option<&User>) -> GuardDecision {
    check_access(route, route.access(), viewer)
}

fn check_access(route: AppRoute, access: RouteAccess, viewer: Option<&User>) -> GuardDecision {
    match (access, viewer) {
        (RouteAccess::Public, _) => GuardDecision::Allow,
        (_, None) => GuardDecision::RedirectToLogin { return_to: route },
        (RouteAccess::Authenticated, Some(_)) => GuardDecision::Allow,
        (RouteAccess::Roles(roles), Some(user)) => {
            if roles.is_empty() || roles.contains(&user.role) {
                GuardDecision::Allow
            } else {
                GuardDecision::RedirectTo(AppRoute::default_redirect())
            }
        }
    }
}

/// 已登录用户访问登录 / 注册页时的去向
pub fn after_login_target(route: AppRoute, return_to: Option<AppRoute>) -> Option<AppRoute> {
    route
        .should_redirect_when_authenticated()
        .then(|| return_to.unwrap_or_else(AppRoute::default_redirect))
}

/// 会话失效时如何进入登录页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForcedLogin {
    /// 登录后返回的页面
    pub return_to: Option<AppRoute>,
    /// 已在登录页时替换当前历史记录，不再追加
    pub push: bool,
}

pub fn forced_login(current: AppRoute) -> ForcedLogin {
    ForcedLogin {
        return_to: (!current.should_redirect_when_authenticated()).then_some(current),
        push: current != AppRoute::auth_failure_redirect(),
    }
}
