//! 表单校验
//!
//! 校验失败时返回 `FieldErrors`（字段 → 消息），不会发起任何请求。

use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone, Utc};
use news_desk_shared::{
    CreateCategoryRequest, CreateNewsRequest, LoginRequest, News, RegisterRequest, Role,
    UpdateCategoryRequest, UpdateNewsRequest, User,
};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// `<input type="datetime-local">` 的取值格式
const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

pub const CATEGORY_CONFLICT_MESSAGE: &str = "A category with this name already exists";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// 与 `\S+@\S+\.\S+` 等价的宽松检查
pub fn looks_like_email(value: &str) -> bool {
    value.split_whitespace().any(|word| {
        word.char_indices().any(|(at, c)| {
            if c != '@' || at == 0 {
                return false;
            }
            let domain = &word[at + 1..];
            domain
                .char_indices()
                .any(|(dot, d)| d == '.' && dot > 0 && dot + 1 < domain.len())
        })
    })
}

/// 解析正整数 id，空串或非法值为 `None`
pub fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// 输入框给出的是用户本地时间，按浏览器时区换算为 UTC
pub fn parse_datetime_local(value: &str) -> Option<DateTime<Utc>> {
    parse_datetime_in(value, &Local)
}

pub fn format_datetime_local(value: &DateTime<Utc>) -> String {
    format_datetime_in(value, &Local)
}

/// 夏令时回拨产生的重复时刻取较早者，跳过的时刻视为非法
fn parse_datetime_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(value.trim(), DATETIME_LOCAL_FORMAT).ok()?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

fn format_datetime_in<Tz: TimeZone>(value: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    value.with_timezone(tz).format(DATETIME_LOCAL_FORMAT).to_string()
}

// =========================================================
// 登录 / 注册
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn validate(&self) -> Result<LoginRequest, FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.username.trim().is_empty() {
            errors.insert("username", "Username is required");
        }
        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        }
        errors.into_result()?;
        Ok(LoginRequest {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, FieldErrors> {
        let mut errors = FieldErrors::default();

        if self.username.trim().is_empty() {
            errors.insert("username", "Username is required");
        } else if self.username.chars().count() < MIN_USERNAME_LEN {
            errors.insert("username", "Username must be at least 3 characters");
        }

        if self.password.is_empty() {
            errors.insert("password", "Password is required");
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.insert("password", "Password must be at least 6 characters");
        }

        if self.password != self.confirm_password {
            errors.insert("confirm_password", "Passwords do not match");
        }

        if !self.email.is_empty() && !looks_like_email(&self.email) {
            errors.insert("email", "Invalid email format");
        }

        errors.into_result()?;
        Ok(RegisterRequest {
            username: self.username.clone(),
            password: self.password.clone(),
            email: Some(self.email.clone()).filter(|e| !e.is_empty()),
            role: None,
            agency_id: None,
        })
    }
}

// =========================================================
// 新闻编辑
// =========================================================

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewsForm {
    pub title: String,
    pub content: String,
    pub category_id: Option<i64>,
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: Option<i64>,
    pub agency_id: Option<i64>,
}

impl NewsForm {
    /// 新建表单；作者的 authorId / agencyId 由会话预填
    pub fn for_new(user: &User) -> Self {
        match user.role {
            Role::Author => Self {
                author_id: Some(user.id),
                agency_id: user.agency_id,
                ..Self::default()
            },
            Role::Admin | Role::Reader => Self::default(),
        }
    }

    pub fn from_news(news: &News) -> Self {
        Self {
            title: news.title.clone(),
            content: news.content.clone(),
            category_id: Some(news.category_id),
            published_at: news.published_at,
            author_id: Some(news.author_id),
            agency_id: Some(news.agency_id),
        }
    }

    pub fn validate(&self, role: Role) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::default();
        if self.title.trim().is_empty() {
            errors.insert("title", "Title is required");
        }
        if self.content.trim().is_empty() {
            errors.insert("content", "Content is required");
        }
        if self.category_id.is_none() {
            errors.insert("category_id", "Select a category");
        }
        if role.is_admin() {
            if self.author_id.is_none() {
                errors.insert("author_id", "Author ID is required");
            }
            if self.agency_id.is_none() {
                errors.insert("agency_id", "Agency ID is required");
            }
        }
        errors.into_result()
    }

    /// 管理员显式提交 authorId / agencyId，作者由服务端推导
    pub fn to_create_request(&self, role: Role) -> Result<CreateNewsRequest, FieldErrors> {
        self.validate(role)?;
        let (author_id, agency_id) = if role.is_admin() {
            (self.author_id, self.agency_id)
        } else {
            (None, None)
        };
        Ok(CreateNewsRequest {
            title: self.title.clone(),
            content: self.content.clone(),
            published_at: self.published_at,
            category_id: self.category_id.unwrap_or_default(),
            author_id,
            agency_id,
        })
    }

    /// 只提交可修改的四个字段；`published_at` 为空时回到草稿
    pub fn to_update_request(&self, role: Role) -> Result<UpdateNewsRequest, FieldErrors> {
        self.validate(role)?;
        Ok(UpdateNewsRequest {
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
            published_at: Some(self.published_at),
            category_id: self.category_id,
        })
    }
}

// =========================================================
// 分类
// =========================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub name: String,
}

impl CategoryForm {
    fn validated_name(&self) -> Result<String, FieldErrors> {
        let name = self.name.trim();
        if name.is_empty() {
            let mut errors = FieldErrors::default();
            errors.insert("name", "Category name is required");
            return Err(errors);
        }
        Ok(name.to_string())
    }

    pub fn to_create_request(&self) -> Result<CreateCategoryRequest, FieldErrors> {
        Ok(CreateCategoryRequest {
            name: self.validated_name()?,
        })
    }

    pub fn to_update_request(&self) -> Result<UpdateCategoryRequest, FieldErrors> {
        Ok(UpdateCategoryRequest {
            name: self.validated_name()?,
        })
    }
}
