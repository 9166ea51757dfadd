//! Data-synchronization client for a users/projects/todos backend.
//!
//! # Overview
//! Maintains an in-memory snapshot of users, projects and todos kept
//! consistent with a remote backend reachable over two query paths: a
//! paginated REST API when authenticated and a single nested GraphQL query
//! when anonymous. Both paths converge to one normalized shape — flat,
//! deduplicated, sorted by update time — before reaching the store.
//!
//! # Design
//! - `ApiClient` is stateless and split into `build_*` / `parse_*` methods;
//!   a [`Transport`] executes the round-trip in between, so the sync logic
//!   never touches the network directly and tests run on canned responses.
//! - The two fetch strategies implement one [`DataSource`] contract;
//!   GraphQL-specific reshaping (string ids, nested reference objects) is
//!   isolated to its variant.
//! - All client state lives in an observable [`Store`] with a closed set of
//!   mutation entry points; deletes apply optimistically and are reconciled
//!   by the next full fetch rather than rolled back.
//! - [`Session`] owns the control flow and the terminal error policy: every
//!   backend failure becomes a user-facing notice, and a rejected token
//!   drops the session back to the anonymous path.

pub mod client;
pub mod error;
pub mod graphql;
pub mod http;
pub mod normalize;
pub mod session;
pub mod sources;
pub mod storage;
pub mod store;
pub mod transport;
pub mod types;

pub use client::{ApiClient, AUTH_SCHEME};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use normalize::normalize;
pub use session::Session;
pub use sources::{DataSource, GraphqlSource, RestSource};
pub use storage::{Credentials, MemoryStorage, TokenStorage};
pub use store::{AuthState, Notice, NoticeLevel, Store};
pub use transport::{Transport, TransportError};
pub use types::{CreateProject, CreateTodo, CreateUser, Project, RawUser, Snapshot, Todo, User};
