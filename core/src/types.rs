//! Domain DTOs for the users/projects/todos backend.
//!
//! # Design
//! Wire shapes are camelCase to match the backend's JSON renderer. `RawUser`
//! is the nested per-user shape both fetch paths converge on before
//! [`normalize`](crate::normalize::normalize) splits it into the flat
//! [`Snapshot`] collections. Todos always carry bare integer `project` /
//! `user` identifiers — the GraphQL path flattens its nested reference
//! objects before producing `RawUser` values.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A user account. `roles` holds role identifiers only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

/// A project. `users` holds member user identifiers, unique within the
/// normalized collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

/// A todo note. `project` and `user` are raw identifiers regardless of which
/// query path produced the value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
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

/// The nested per-user shape returned by the users endpoint and produced by
/// the GraphQL reshaping step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(flatten)]
    pub user: User,
    pub user_projects: Vec<Project>,
    pub user_todos: Vec<Todo>,
}

/// The normalized, flat, deduplicated view of the whole backend. This is the
/// single shape the store holds and views render from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    pub users: Vec<User>,
    pub projects: Vec<Project>,
    pub todos: Vec<Todo>,
}

/// Registration payload for a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birthdate: Option<NaiveDate>,
}

/// Creation payload for a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    pub name: String,
    pub repository: String,
    pub users: Vec<i64>,
}

/// Creation payload for a todo.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTodo {
    pub project: i64,
    pub user: i64,
    pub text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_user_deserializes_camel_case() {
        let json = r#"{
            "id": 1,
            "username": "ada",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "middleName": "",
            "email": "ada@example.com",
            "birthdate": "1815-12-10",
            "roles": [1, 2],
            "userProjects": [{
                "id": 7,
                "name": "Engine",
                "repository": "https://example.com/engine",
                "isActive": true,
                "created": "2024-01-01T00:00:00Z",
                "updated": "2024-01-02T00:00:00Z",
                "users": [1]
            }],
            "userTodos": [{
                "id": 3,
                "text": "Write notes",
                "isActive": true,
                "created": "2024-01-01T00:00:00Z",
                "updated": "2024-01-03T00:00:00Z",
                "project": 7,
                "user": 1
            }]
        }"#;
        let raw: RawUser = serde_json::from_str(json).unwrap();
        assert_eq!(raw.user.username, "ada");
        assert_eq!(raw.user.roles, vec![1, 2]);
        assert_eq!(raw.user_projects[0].id, 7);
        assert_eq!(raw.user_todos[0].project, 7);
        assert_eq!(raw.user_todos[0].user, 1);
    }

    #[test]
    fn user_serializes_camel_case_keys() {
        let user = User {
            id: 1,
            username: "ada".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            middle_name: String::new(),
            email: "ada@example.com".to_string(),
            birthdate: None,
            roles: Vec::new(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("firstName").is_some());
        assert!(json.get("first_name").is_none());
    }

    #[test]
    fn create_user_omits_missing_birthdate() {
        let input = CreateUser {
            username: "ada".to_string(),
            password: "secret".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            middle_name: String::new(),
            email: "ada@example.com".to_string(),
            birthdate: None,
        };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("birthdate").is_none());
    }
}
