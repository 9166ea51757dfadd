//! Stateless HTTP request builder and response parser for the backend API.
//!
//! # Design
//! `ApiClient` holds only the base URL and paging defaults and carries no
//! mutable state between calls. Each operation is split into a `build_*`
//! method that produces an [`HttpRequest`] and a `parse_*` method that
//! consumes an [`HttpResponse`]; a [`Transport`](crate::Transport) executes
//! the round-trip in between. The token is passed per call so the client
//! never owns authentication state — that lives in the store.

use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::graphql;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateProject, CreateTodo, CreateUser, RawUser};

pub const USERS_ENDPOINT: &str = "/api/users/";
pub const PROJECTS_ENDPOINT: &str = "/api/projects/";
pub const TODOS_ENDPOINT: &str = "/api/todos/";
pub const TOKEN_ENDPOINT: &str = "/api/token/";
pub const GRAPHQL_ENDPOINT: &str = "/graphql/";

/// Custom bearer-style scheme the backend expects in the Authorization
/// header. Deliberately non-standard so off-the-shelf clients cannot replay
/// captured tokens.
pub const AUTH_SCHEME: &str = "Bear_R@d1f";

/// One page large enough to request "all" rows in a single call.
const DEFAULT_LIMIT: u32 = 1000;
const DEFAULT_OFFSET: u32 = 0;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access: String,
}

#[derive(Debug, Deserialize)]
struct PageResponse {
    results: Vec<RawUser>,
}

/// Synchronous, stateless client for the backend API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    limit: u32,
    offset: u32,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            limit: DEFAULT_LIMIT,
            offset: DEFAULT_OFFSET,
        }
    }

    /// Override the paging window used by the users fetch.
    pub fn with_page(mut self, limit: u32, offset: u32) -> Self {
        self.limit = limit;
        self.offset = offset;
        self
    }

    /// Common headers, with the auth header attached only when a token is
    /// present. A token that cannot be represented as a header value is
    /// rejected here, before any request is built.
    fn headers(&self, token: Option<&str>) -> Result<Vec<(String, String)>, ApiError> {
        let mut headers = vec![(
            "content-type".to_string(),
            "application/json".to_string(),
        )];
        if let Some(token) = token {
            if token.is_empty() || !token.chars().all(|c| c.is_ascii_graphic()) {
                return Err(ApiError::MalformedToken);
            }
            headers.push((
                "authorization".to_string(),
                format!("{AUTH_SCHEME} {token}"),
            ));
        }
        Ok(headers)
    }

    // --- authentication ---

    pub fn build_obtain_token(&self, login: &str, password: &str) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&json!({
            "username": login,
            "password": password,
        }))
        .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{TOKEN_ENDPOINT}", self.base_url),
            headers: self.headers(None)?,
            body: Some(body),
        })
    }

    pub fn parse_obtain_token(&self, response: HttpResponse) -> Result<String, ApiError> {
        check_status(&response, 200)?;
        let parsed: TokenResponse = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(parsed.access)
    }

    // --- fetch, REST path ---

    pub fn build_fetch_users(&self, token: &str) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Get,
            url: format!(
                "{}{USERS_ENDPOINT}?limit={}&offset={}",
                self.base_url, self.limit, self.offset
            ),
            headers: self.headers(Some(token))?,
            body: None,
        })
    }

    pub fn parse_fetch_users(&self, response: HttpResponse) -> Result<Vec<RawUser>, ApiError> {
        check_status(&response, 200)?;
        let page: PageResponse = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(page.results)
    }

    // --- fetch, GraphQL path (anonymous only) ---

    pub fn build_fetch_graphql(&self) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&json!({ "query": graphql::ALL_USERS_QUERY }))
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{GRAPHQL_ENDPOINT}", self.base_url),
            headers: self.headers(None)?,
            body: Some(body),
        })
    }

    pub fn parse_fetch_graphql(&self, response: HttpResponse) -> Result<Vec<RawUser>, ApiError> {
        check_status(&response, 200)?;
        graphql::parse_all_users(&response.body)
    }

    // --- creation ---

    /// Registration is open: no token is attached.
    pub fn build_create_user(&self, input: &CreateUser) -> Result<HttpRequest, ApiError> {
        self.build_create(USERS_ENDPOINT, input, None)
    }

    pub fn build_create_project(
        &self,
        token: &str,
        input: &CreateProject,
    ) -> Result<HttpRequest, ApiError> {
        self.build_create(PROJECTS_ENDPOINT, input, Some(token))
    }

    pub fn build_create_todo(
        &self,
        token: &str,
        input: &CreateTodo,
    ) -> Result<HttpRequest, ApiError> {
        self.build_create(TODOS_ENDPOINT, input, Some(token))
    }

    fn build_create<T: serde::Serialize>(
        &self,
        endpoint: &str,
        input: &T,
        token: Option<&str>,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}{endpoint}", self.base_url),
            headers: self.headers(token)?,
            body: Some(body),
        })
    }

    pub fn parse_create(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 201)
    }

    // --- deletion ---

    pub fn build_delete_project(&self, token: &str, id: i64) -> Result<HttpRequest, ApiError> {
        self.build_delete(PROJECTS_ENDPOINT, token, id)
    }

    pub fn build_delete_todo(&self, token: &str, id: i64) -> Result<HttpRequest, ApiError> {
        self.build_delete(TODOS_ENDPOINT, token, id)
    }

    fn build_delete(&self, endpoint: &str, token: &str, id: i64) -> Result<HttpRequest, ApiError> {
        Ok(HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}{endpoint}{id}", self.base_url),
            headers: self.headers(Some(token))?,
            body: None,
        })
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(ApiError::from_status(
        response.status,
        response.body.clone(),
    ))
}
