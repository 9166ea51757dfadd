//! In-memory stand-in for the users/projects/todos backend.
//!
//! Implements the boundary the sync client consumes: token issuance against
//! registered credentials, a paginated users endpoint returning the nested
//! `{results: [...]}` shape, open registration, authenticated create/delete
//! with server-side cascade from projects to todos, and a GraphQL endpoint
//! returning the string-id nested shape the client reshapes. Wire types are
//! defined here independently of the client crate; the client's integration
//! tests catch any schema drift.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Custom auth scheme expected in the Authorization header.
pub const AUTH_SCHEME: &str = "Bear_R@d1f";

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub email: String,
    pub birthdate: Option<NaiveDate>,
    pub roles: Vec<i64>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub repository: String,
    pub is_active: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub users: Vec<i64>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub text: String,
    pub is_active: bool,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub project: i64,
    pub user: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
    pub email: String,
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: String,
    pub repository: String,
    pub users: Vec<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub project: i64,
    pub user: i64,
    pub text: String,
}

#[derive(Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct GraphqlRequest {
    pub query: String,
}

#[derive(Deserialize)]
pub struct Page {
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Default)]
pub struct AppState {
    users: Vec<User>,
    passwords: HashMap<String, String>,
    projects: Vec<Project>,
    todos: Vec<Todo>,
    /// token -> username
    tokens: HashMap<String, String>,
    next_user_id: i64,
    next_project_id: i64,
    next_todo_id: i64,
}

pub type Db = Arc<RwLock<AppState>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(AppState::default()));
    Router::new()
        .route("/api/token/", post(obtain_token))
        .route("/api/users/", get(list_users).post(create_user))
        .route("/api/projects/", post(create_project))
        .route("/api/projects/{id}", delete(delete_project))
        .route("/api/todos/", post(create_todo))
        .route("/api/todos/{id}", delete(delete_todo))
        .route("/graphql/", post(graphql))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Validate the custom-scheme Authorization header against issued tokens.
fn require_token(headers: &HeaderMap, state: &AppState) -> Result<(), StatusCode> {
    let value = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let token = value
        .strip_prefix(AUTH_SCHEME)
        .map(str::trim)
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if state.tokens.contains_key(token) {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn obtain_token(
    State(db): State<Db>,
    Json(input): Json<TokenRequest>,
) -> Result<Json<Value>, StatusCode> {
    let mut state = db.write().await;
    let known = state
        .passwords
        .get(&input.username)
        .is_some_and(|password| *password == input.password);
    if !known {
        return Err(StatusCode::UNAUTHORIZED);
    }
    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), input.username);
    Ok(Json(json!({ "access": token })))
}

/// The nested per-user shape: each user carries every project they are a
/// member of and every todo they own.
fn nested_user(state: &AppState, user: &User) -> Value {
    let mut out = serde_json::to_value(user).expect("user serializes");
    let projects: Vec<&Project> = state
        .projects
        .iter()
        .filter(|p| p.users.contains(&user.id))
        .collect();
    let todos: Vec<&Todo> = state.todos.iter().filter(|t| t.user == user.id).collect();
    out["userProjects"] = serde_json::to_value(projects).expect("projects serialize");
    out["userTodos"] = serde_json::to_value(todos).expect("todos serialize");
    out
}

async fn list_users(
    State(db): State<Db>,
    Query(page): Query<Page>,
    headers: HeaderMap,
) -> Result<Json<Value>, StatusCode> {
    let state = db.read().await;
    require_token(&headers, &state)?;
    let offset = page.offset.unwrap_or(0);
    let limit = page.limit.unwrap_or(usize::MAX);
    let results: Vec<Value> = state
        .users
        .iter()
        .skip(offset)
        .take(limit)
        .map(|user| nested_user(&state, user))
        .collect();
    Ok(Json(json!({ "results": results })))
}

async fn create_user(
    State(db): State<Db>,
    Json(input): Json<CreateUser>,
) -> Result<(StatusCode, Json<User>), StatusCode> {
    let mut state = db.write().await;
    if state.users.iter().any(|u| u.username == input.username) {
        return Err(StatusCode::BAD_REQUEST);
    }
    state.next_user_id += 1;
    let user = User {
        id: state.next_user_id,
        username: input.username.clone(),
        first_name: input.first_name,
        last_name: input.last_name,
        middle_name: input.middle_name,
        email: input.email,
        birthdate: input.birthdate,
        roles: Vec::new(),
    };
    state.passwords.insert(input.username, input.password);
    state.users.push(user.clone());
    Ok((StatusCode::CREATED, Json(user)))
}

async fn create_project(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateProject>,
) -> Result<(StatusCode, Json<Project>), StatusCode> {
    let mut state = db.write().await;
    require_token(&headers, &state)?;
    let all_known = input
        .users
        .iter()
        .all(|id| state.users.iter().any(|u| u.id == *id));
    if input.users.is_empty() || !all_known {
        return Err(StatusCode::BAD_REQUEST);
    }
    state.next_project_id += 1;
    let now = Utc::now();
    let project = Project {
        id: state.next_project_id,
        name: input.name,
        repository: input.repository,
        is_active: true,
        created: now,
        updated: now,
        users: input.users,
    };
    state.projects.push(project.clone());
    Ok((StatusCode::CREATED, Json(project)))
}

async fn create_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreateTodo>,
) -> Result<(StatusCode, Json<Todo>), StatusCode> {
    let mut state = db.write().await;
    require_token(&headers, &state)?;
    let project_known = state.projects.iter().any(|p| p.id == input.project);
    let user_known = state.users.iter().any(|u| u.id == input.user);
    if !project_known || !user_known {
        return Err(StatusCode::BAD_REQUEST);
    }
    state.next_todo_id += 1;
    let now = Utc::now();
    let todo = Todo {
        id: state.next_todo_id,
        text: input.text,
        is_active: true,
        created: now,
        updated: now,
        project: input.project,
        user: input.user,
    };
    state.todos.push(todo.clone());
    Ok((StatusCode::CREATED, Json(todo)))
}

async fn delete_project(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    require_token(&headers, &state)?;
    if !state.projects.iter().any(|p| p.id == id) {
        return Err(StatusCode::NOT_FOUND);
    }
    state.projects.retain(|p| p.id != id);
    // Server-side cascade, mirrored by the client's optimistic removal.
    state.todos.retain(|t| t.project != id);
    Ok(StatusCode::NO_CONTENT)
}

async fn delete_todo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<StatusCode, StatusCode> {
    let mut state = db.write().await;
    require_token(&headers, &state)?;
    if !state.todos.iter().any(|t| t.id == id) {
        return Err(StatusCode::NOT_FOUND);
    }
    state.todos.retain(|t| t.id != id);
    Ok(StatusCode::NO_CONTENT)
}

/// GraphQL ids are strings and references are single-field objects, the
/// shape the client's reshaping step consumes.
fn gql_user(state: &AppState, user: &User) -> Value {
    let projects: Vec<Value> = state
        .projects
        .iter()
        .filter(|p| p.users.contains(&user.id))
        .map(|p| {
            json!({
                "id": p.id.to_string(),
                "name": p.name,
                "repository": p.repository,
                "isActive": p.is_active,
                "created": p.created,
                "updated": p.updated,
                "users": p.users.iter().map(|id| json!({"id": id.to_string()})).collect::<Vec<_>>(),
            })
        })
        .collect();
    let todos: Vec<Value> = state
        .todos
        .iter()
        .filter(|t| t.user == user.id)
        .map(|t| {
            json!({
                "id": t.id.to_string(),
                "text": t.text,
                "isActive": t.is_active,
                "created": t.created,
                "updated": t.updated,
                "project": {"id": t.project.to_string()},
                "user": {"id": t.user.to_string()},
            })
        })
        .collect();
    json!({
        "id": user.id.to_string(),
        "username": user.username,
        "firstName": user.first_name,
        "lastName": user.last_name,
        "middleName": user.middle_name,
        "email": user.email,
        "birthdate": user.birthdate,
        "roles": user.roles.iter().map(|id| json!({"id": id.to_string(), "role": ""})).collect::<Vec<_>>(),
        "userProjects": projects,
        "userTodos": todos,
    })
}

async fn graphql(
    State(db): State<Db>,
    Json(input): Json<GraphqlRequest>,
) -> Result<Json<Value>, StatusCode> {
    if !input.query.contains("allUsers") {
        return Err(StatusCode::BAD_REQUEST);
    }
    let state = db.read().await;
    let users: Vec<Value> = state.users.iter().map(|u| gql_user(&state, u)).collect();
    Ok(Json(json!({ "data": { "allUsers": users } })))
}
