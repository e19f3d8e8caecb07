use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod date;
pub mod protocol;

pub use date::Timestamp;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const BEARER_PREFIX: &str = "Bearer ";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// =========================================================
// 角色 (Roles)
// =========================================================

/// User role as embedded in the access token.
///
/// Fixed for the life of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Reader,
    Author,
    Admin,
}

impl Role {
    /// Whether the role may write and edit news.
    pub fn can_author(self) -> bool {
        match self {
            Role::Reader => false,
            Role::Author | Role::Admin => true,
        }
    }

    /// Whether the role may administer categories and agencies.
    pub fn is_admin(self) -> bool {
        match self {
            Role::Admin => true,
            Role::Reader | Role::Author => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Reader => "Reader",
            Role::Author => "Author",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<Agency>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agency {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users: Option<Vec<User>>,
}

/// Category names are unique server-side; a clash comes back as 409.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// A news item. `published_at == None` marks a draft.
///
/// Author, agency and category references are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct News {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
    pub author_id: i64,
    pub agency_id: i64,
    pub category_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency: Option<Agency>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

impl News {
    pub fn is_draft(&self) -> bool {
        self.published_at.is_none()
    }

    /// Admins may edit anything; authors only their own items.
    pub fn editable_by(&self, user: &User) -> bool {
        match user.role {
            Role::Admin => true,
            Role::Author => user.id == self.author_id,
            Role::Reader => false,
        }
    }

    /// Case-insensitive match of `term` against title and content.
    pub fn matches_term(&self, term: &str) -> bool {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

// =========================================================
// 认证 (Auth)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<i64>,
}

/// Body returned by both `/auth/login` and `/auth/register`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenResponse {
    pub access_token: String,
}

/// Claims embedded in the access token payload.
///
/// The client never verifies the signature; these claims are the only
/// source of the current user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenClaims {
    pub id: i64,
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub agency_id: Option<i64>,
    /// Expiry, epoch seconds.
    pub exp: i64,
}

impl TokenClaims {
    pub fn expires_at(&self) -> Timestamp {
        Timestamp::from_secs(self.exp)
    }

    pub fn is_expired(&self, now: Timestamp) -> bool {
        self.expires_at() < now
    }

    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            username: self.username.clone(),
            email: None,
            role: self.role,
            agency_id: self.agency_id,
            agency: None,
        }
    }
}

// =========================================================
// 新闻请求 (News requests)
// =========================================================

/// Transient listing constraints. `search_term` stays on the client.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
}

impl NewsFilters {
    /// Query pairs for the server; unset fields and the search term are omitted.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.category_id {
            query.push(("categoryId", id.to_string()));
        }
        if let Some(id) = self.agency_id {
            query.push(("agencyId", id.to_string()));
        }
        if let Some(date) = self.start_date {
            query.push(("startDate", date.to_string()));
        }
        if let Some(date) = self.end_date {
            query.push(("endDate", date.to_string()));
        }
        query
    }

    pub fn with_agency(mut self, agency_id: Option<i64>) -> Self {
        self.agency_id = agency_id;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNewsRequest {
    pub title: String,
    pub content: String,
    pub published_at: Option<DateTime<Utc>>,
    pub category_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<i64>,
}

/// Partial update. Only these four fields are revisable.
///
/// `published_at: Some(None)` serializes as `null` and turns the item back
/// into a draft.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNewsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Option<DateTime<Utc>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
}

// =========================================================
// 分类与机构请求 (Category / Agency requests)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAgencyRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateAgencyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_capabilities() {
        assert!(!Role::Reader.can_author());
        assert!(Role::Author.can_author());
        assert!(Role::Admin.can_author());
        assert!(Role::Admin.is_admin());
        assert!(!Role::Author.is_admin());
    }

    #[test]
    fn unknown_role_is_rejected() {
        let result: Result<Role, _> = serde_json::from_value(json!("Editor"));
        assert!(result.is_err());
    }

    #[test]
    fn filters_query_skips_unset_fields() {
        let filters = NewsFilters {
            category_id: Some(3),
            search_term: Some("rust".to_string()),
            ..Default::default()
        };
        assert_eq!(filters.to_query(), vec![("categoryId", "3".to_string())]);
    }

    #[test]
    fn filters_query_formats_dates() {
        let filters = NewsFilters {
            agency_id: Some(5),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 3),
            ..Default::default()
        };
        assert_eq!(
            filters.to_query(),
            vec![
                ("agencyId", "5".to_string()),
                ("startDate", "2024-01-02".to_string()),
                ("endDate", "2024-02-03".to_string()),
            ]
        );
    }

    #[test]
    fn news_decodes_camel_case_and_draft() {
        let news: News = serde_json::from_value(json!({
            "id": 7,
            "title": "Hello",
            "content": "World",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-01T10:00:00.000Z",
            "publishedAt": null,
            "authorId": 1,
            "agencyId": 5,
            "categoryId": 3,
            "category": { "id": 3, "name": "Tech" }
        }))
        .unwrap();
        assert!(news.is_draft());
        assert_eq!(news.category.unwrap().name, "Tech");
    }

    #[test]
    fn update_request_serializes_explicit_null_publish() {
        let patch = UpdateNewsRequest {
            title: Some("t".to_string()),
            published_at: Some(None),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&patch).unwrap(),
            json!({ "title": "t", "publishedAt": null })
        );
    }

    #[test]
    fn create_request_keeps_null_publish_and_drops_missing_ids() {
        let req = CreateNewsRequest {
            title: "t".to_string(),
            content: "c".to_string(),
            published_at: None,
            category_id: 2,
            author_id: None,
            agency_id: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "title": "t", "content": "c", "publishedAt": null, "categoryId": 2 })
        );
    }

    #[test]
    fn claims_expiry_is_compared_in_millis() {
        let claims = TokenClaims {
            id: 1,
            username: "alice".to_string(),
            role: Role::Author,
            agency_id: Some(5),
            exp: 100,
        };
        assert!(!claims.is_expired(Timestamp::new(100_000)));
        assert!(claims.is_expired(Timestamp::new(100_001)));
        assert_eq!(claims.to_user().agency_id, Some(5));
    }

    #[test]
    fn search_term_matches_title_or_content() {
        let news: News = serde_json::from_value(json!({
            "id": 1, "title": "Rust Release", "content": "Body text",
            "createdAt": "2024-03-01T10:00:00Z", "updatedAt": "2024-03-01T10:00:00Z",
            "publishedAt": "2024-03-01T10:00:00Z",
            "authorId": 1, "agencyId": 1, "categoryId": 1
        }))
        .unwrap();
        assert!(news.matches_term("rust"));
        assert!(news.matches_term("BODY"));
        assert!(news.matches_term("  "));
        assert!(!news.matches_term("python"));
    }

    #[test]
    fn edit_rights_follow_role_and_authorship() {
        let news: News = serde_json::from_value(json!({
            "id": 1, "title": "t", "content": "c",
            "createdAt": "2024-03-01T10:00:00Z", "updatedAt": "2024-03-01T10:00:00Z",
            "publishedAt": null,
            "authorId": 2, "agencyId": 1, "categoryId": 1
        }))
        .unwrap();
        let user = |id, role| User {
            id,
            username: "u".to_string(),
            email: None,
            role,
            agency_id: None,
            agency: None,
        };
        assert!(news.editable_by(&user(9, Role::Admin)));
        assert!(news.editable_by(&user(2, Role::Author)));
        assert!(!news.editable_by(&user(3, Role::Author)));
        assert!(!news.editable_by(&user(2, Role::Reader)));
    }
}
