//! 路由定义模块 - 领域模型
//!
//! 纯业务逻辑，不依赖 DOM 或 web_sys。
//! 定义应用的所有路由及其访问要求。

use std::fmt::Display;

use news_desk_shared::Role;

const EDITOR_ROLES: &[Role] = &[Role::Author, Role::Admin];
const ADMIN_ROLES: &[Role] = &[Role::Admin];

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    Login,
    Register,
    /// 新闻首页 (默认路由)
    #[default]
    Home,
    NewsDetail(i64),
    /// 个人资料 (需要认证)
    Profile,
    /// 机构新闻 (作者 / 管理员)
    AgencyNews,
    /// 新闻编辑器，`None` 为新建 (作者 / 管理员)
    NewsEditor(Option<i64>),
    /// 分类管理 (仅管理员)
    AdminCategories,
    NotFound,
}

/// 路由访问要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// 仅需登录
    Authenticated,
    /// 登录且角色在集合内；空集合等同于 `Authenticated`
    Roles(&'static [Role]),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Self::Home,
            ["login"] => Self::Login,
            ["register"] => Self::Register,
            ["profile"] => Self::Profile,
            ["agency", "news"] => Self::AgencyNews,
            ["admin", "categories"] => Self::AdminCategories,
            ["news", "editor"] => Self::NewsEditor(None),
            ["news", "editor", id] => match id.parse() {
                Ok(id) => Self::NewsEditor(Some(id)),
                Err(_) => Self::NotFound,
            },
            ["news", id] => match id.parse() {
                Ok(id) => Self::NewsDetail(id),
                Err(_) => Self::NotFound,
            },
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Register => "/register".to_string(),
            Self::Home => "/".to_string(),
            Self::NewsDetail(id) => format!("/news/{id}"),
            Self::Profile => "/profile".to_string(),
            Self::AgencyNews => "/agency/news".to_string(),
            Self::NewsEditor(None) => "/news/editor".to_string(),
            Self::NewsEditor(Some(id)) => format!("/news/editor/{id}"),
            Self::AdminCategories => "/admin/categories".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// 写入地址栏的路径；未知路径保持用户输入的原样
    pub fn location(&self, requested: &str) -> String {
        match self {
            Self::NotFound => requested.to_string(),
            _ => self.to_path(),
        }
    }

    /// **核心守卫配置：定义该路由的访问要求**
    pub fn access(&self) -> RouteAccess {
        match self {
            Self::Login
            | Self::Register
            | Self::Home
            | Self::NewsDetail(_)
            | Self::NotFound => RouteAccess::Public,
            Self::Profile => RouteAccess::Authenticated,
            Self::AgencyNews | Self::NewsEditor(_) => RouteAccess::Roles(EDITOR_ROLES),
            Self::AdminCategories => RouteAccess::Roles(ADMIN_ROLES),
        }
    }

    /// 已认证用户是否应该离开此路由（登录 / 注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 登录后无记忆目标时、以及角色不符时的重定向目标
    pub fn default_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}
