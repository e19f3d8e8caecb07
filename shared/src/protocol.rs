use crate::{
    Agency, AuthTokenResponse, Category, CreateAgencyRequest, CreateCategoryRequest,
    CreateNewsRequest, LoginRequest, News, NewsFilters, RegisterRequest, UpdateAgencyRequest,
    UpdateCategoryRequest, UpdateNewsRequest, User,
};
use serde::de::{DeserializeOwned, IgnoredAny};
use serde::{Deserialize, Serialize};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// Paths are relative to the API base (which already ends in `/api`).
pub trait ApiRequest {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The JSON body type; `()` for body-less calls.
    type Body: Serialize;
    /// The HTTP method.
    const METHOD: HttpMethod;

    fn path(&self) -> String;

    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }

    fn body(&self) -> Option<&Self::Body> {
        None
    }
}

/// Deletes answer with an empty body or an echo of the removed entity.
pub type Deleted = IgnoredAny;

// =========================================================
// Auth
// =========================================================

impl ApiRequest for LoginRequest {
    type Response = AuthTokenResponse;
    type Body = Self;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

impl ApiRequest for RegisterRequest {
    type Response = AuthTokenResponse;
    type Body = Self;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

// =========================================================
// News
// =========================================================

/// List news matching the explicitly set filters
#[derive(Debug, Clone, Default)]
pub struct ListNewsRequest {
    pub filters: NewsFilters,
}

impl ApiRequest for ListNewsRequest {
    type Response = Vec<News>;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/news".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        self.filters.to_query()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetNewsRequest {
    pub id: i64,
}

impl ApiRequest for GetNewsRequest {
    type Response = News;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/news/{}", self.id)
    }
}

impl ApiRequest for CreateNewsRequest {
    type Response = News;
    type Body = Self;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/news".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
pub struct PatchNewsRequest {
    pub id: i64,
    pub patch: UpdateNewsRequest,
}

impl ApiRequest for PatchNewsRequest {
    type Response = News;
    type Body = UpdateNewsRequest;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/news/{}", self.id)
    }

    fn body(&self) -> Option<&UpdateNewsRequest> {
        Some(&self.patch)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteNewsRequest {
    pub id: i64,
}

impl ApiRequest for DeleteNewsRequest {
    type Response = Deleted;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/news/{}", self.id)
    }
}

// =========================================================
// Categories
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ListCategoriesRequest;

impl ApiRequest for ListCategoriesRequest {
    type Response = Vec<Category>;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/categories".to_string()
    }
}

impl ApiRequest for CreateCategoryRequest {
    type Response = Category;
    type Body = Self;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/categories".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
pub struct PatchCategoryRequest {
    pub id: i64,
    pub patch: UpdateCategoryRequest,
}

impl ApiRequest for PatchCategoryRequest {
    type Response = Category;
    type Body = UpdateCategoryRequest;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/categories/{}", self.id)
    }

    fn body(&self) -> Option<&UpdateCategoryRequest> {
        Some(&self.patch)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteCategoryRequest {
    pub id: i64,
}

impl ApiRequest for DeleteCategoryRequest {
    type Response = Deleted;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/categories/{}", self.id)
    }
}

// =========================================================
// Agencies
// =========================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct ListAgenciesRequest;

impl ApiRequest for ListAgenciesRequest {
    type Response = Vec<Agency>;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/agencies".to_string()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GetAgencyRequest {
    pub id: i64,
}

impl ApiRequest for GetAgencyRequest {
    type Response = Agency;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/agencies/{}", self.id)
    }
}

impl ApiRequest for CreateAgencyRequest {
    type Response = Agency;
    type Body = Self;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/agencies".to_string()
    }

    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

#[derive(Debug, Clone)]
pub struct PatchAgencyRequest {
    pub id: i64,
    pub patch: UpdateAgencyRequest,
}

impl ApiRequest for PatchAgencyRequest {
    type Response = Agency;
    type Body = UpdateAgencyRequest;
    const METHOD: HttpMethod = HttpMethod::Patch;

    fn path(&self) -> String {
        format!("/agencies/{}", self.id)
    }

    fn body(&self) -> Option<&UpdateAgencyRequest> {
        Some(&self.patch)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteAgencyRequest {
    pub id: i64,
}

impl ApiRequest for DeleteAgencyRequest {
    type Response = Deleted;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/agencies/{}", self.id)
    }
}

// =========================================================
// Users
// =========================================================

#[derive(Debug, Clone, Copy)]
pub struct GetUserRequest {
    pub id: i64,
}

impl ApiRequest for GetUserRequest {
    type Response = User;
    type Body = ();
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/users/{}", self.id)
    }
}
