//! GraphQL wire shapes and their reshaping into the REST-equivalent form.
//!
//! # Design
//! The GraphQL schema types identifiers as strings and wraps every reference
//! in a single-field object (`{"id": "7"}`), so its payload cannot be fed to
//! [`normalize`](crate::normalize::normalize) directly. This module owns the
//! query text, the raw wire types, and the one reconciliation step that
//! coerces ids to integers and flattens reference objects, producing exactly
//! the [`RawUser`] shape the REST path returns. Any divergence between the
//! two paths after this step is a defect.

use serde::Deserialize;

use crate::error::ApiError;
use crate::types::{Project, RawUser, Todo, User};

/// The single query the anonymous path issues: all users with nested roles,
/// projects and todos.
pub const ALL_USERS_QUERY: &str = "{
  allUsers {
    id
    username
    firstName
    lastName
    middleName
    email
    birthdate
    roles {
      id
      role
    }
    userProjects {
      id
      name
      repository
      isActive
      created
      updated
      users {
        id
      }
    }
    userTodos {
      id
      text
      isActive
      created
      updated
      project {
        id
      }
      user {
        id
      }
    }
  }
}";

#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub data: AllUsersData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllUsersData {
    pub all_users: Vec<GqlUser>,
}

/// A bare reference object, e.g. `{"id": "7"}`.
#[derive(Debug, Deserialize)]
pub struct GqlRef {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct GqlRole {
    pub id: String,
    pub role: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlProject {
    pub id: String,
    pub name: String,
    pub repository: String,
    pub is_active: bool,
    pub created: chrono::DateTime<chrono::Utc>,
    pub updated: chrono::DateTime<chrono::Utc>,
    pub users: Vec<GqlRef>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlTodo {
    pub id: String,
    pub text: String,
    pub is_active: bool,
    pub created: chrono::DateTime<chrono::Utc>,
    pub updated: chrono::DateTime<chrono::Utc>,
    pub project: GqlRef,
    pub user: GqlRef,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GqlUser {
    pub id: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub email: String,
    pub birthdate: Option<chrono::NaiveDate>,
    pub roles: Vec<GqlRole>,
    pub user_projects: Vec<GqlProject>,
    pub user_todos: Vec<GqlTodo>,
}

/// Parse a GraphQL string id into the integer form used everywhere else.
fn parse_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::Deserialization(format!("non-numeric id: {raw:?}")))
}

/// Reshape one GraphQL user into the REST-equivalent nested shape: integer
/// ids everywhere, reference objects flattened to bare ids, member objects
/// flattened to an id array.
pub fn into_raw_user(gql: GqlUser) -> Result<RawUser, ApiError> {
    let user_projects = gql
        .user_projects
        .into_iter()
        .map(|p| {
            Ok(Project {
                id: parse_id(&p.id)?,
                name: p.name,
                repository: p.repository,
                is_active: p.is_active,
                created: p.created,
                updated: p.updated,
                users: p
                    .users
                    .iter()
                    .map(|r| parse_id(&r.id))
                    .collect::<Result<Vec<_>, _>>()?,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    let user_todos = gql
        .user_todos
        .into_iter()
        .map(|t| {
            Ok(Todo {
                id: parse_id(&t.id)?,
                text: t.text,
                is_active: t.is_active,
                created: t.created,
                updated: t.updated,
                project: parse_id(&t.project.id)?,
                user: parse_id(&t.user.id)?,
            })
        })
        .collect::<Result<Vec<_>, ApiError>>()?;

    Ok(RawUser {
        user: User {
            id: parse_id(&gql.id)?,
            username: gql.username,
            first_name: gql.first_name,
            last_name: gql.last_name,
            middle_name: gql.middle_name,
            email: gql.email,
            birthdate: gql.birthdate,
            roles: gql
                .roles
                .iter()
                .map(|r| parse_id(&r.id))
                .collect::<Result<Vec<_>, _>>()?,
        },
        user_projects,
        user_todos,
    })
}

/// Parse a full GraphQL response body into reshaped users.
pub fn parse_all_users(body: &str) -> Result<Vec<RawUser>, ApiError> {
    let envelope: Envelope =
        serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))?;
    envelope
        .data
        .all_users
        .into_iter()
        .map(into_raw_user)
        .collect()
}
