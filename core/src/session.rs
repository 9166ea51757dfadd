//! The data-synchronization session: the operations the UI layer calls.
//!
//! # Design
//! `Session` wires the stateless [`ApiClient`] to a [`Transport`], a
//! [`TokenStorage`] and the observable [`Store`]. Every backend failure is
//! caught here and translated into a user-facing notice — nothing is
//! rethrown to callers and nothing is retried; the user retriggers the
//! action. A rejected or malformed token additionally clears the stored
//! credentials and drops the session back to the anonymous fetch path.

use tracing::{debug, warn};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::normalize::normalize;
use crate::sources::{DataSource, GraphqlSource, RestSource};
use crate::storage::{Credentials, TokenStorage};
use crate::store::{NoticeLevel, Store};
use crate::transport::Transport;
use crate::types::{CreateProject, CreateTodo, CreateUser};

const SUCCESS_NOTICE: &str = "Operation completed successfully";
const BAD_CREDENTIALS_NOTICE: &str = "Invalid login or password";

/// A running client session over one backend.
pub struct Session<T: Transport, S: TokenStorage> {
    client: ApiClient,
    transport: T,
    storage: S,
    store: Store,
}

impl<T: Transport, S: TokenStorage> Session<T, S> {
    pub fn new(client: ApiClient, transport: T, storage: S) -> Self {
        Self {
            client,
            transport,
            storage,
            store: Store::new(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Mutable store access, for subscribing views.
    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Load persisted credentials and run the first full fetch. Called once
    /// at startup.
    pub fn start(&mut self) {
        if let Some(Credentials { token, login }) = self.storage.load() {
            self.store.set_authenticated(token, login);
        }
        self.fetch_all();
    }

    /// Exchange login/password for a token. On success the credentials are
    /// persisted and a full fetch runs over the authenticated path; on
    /// failure local state and storage stay untouched and no fetch runs.
    pub fn authenticate(&mut self, login: &str, password: &str) {
        match self.request_token(login, password) {
            Ok(token) => {
                let credentials = Credentials {
                    token: token.clone(),
                    login: login.to_string(),
                };
                self.storage.save(&credentials);
                self.store.set_authenticated(token, login.to_string());
                self.fetch_all();
            }
            Err(err) => {
                warn!(%err, "token request failed");
                self.store.set_notice(NoticeLevel::Error, BAD_CREDENTIALS_NOTICE);
            }
        }
    }

    fn request_token(&mut self, login: &str, password: &str) -> Result<String, ApiError> {
        let request = self.client.build_obtain_token(login, password)?;
        let response = self.transport.execute(request)?;
        self.client.parse_obtain_token(response)
    }

    /// Clear credentials and state, then refetch over the anonymous path.
    pub fn deauthenticate(&mut self) {
        self.storage.clear();
        self.store.set_anonymous();
        self.fetch_all();
    }

    /// Full reconciliation: anonymous sessions query GraphQL, authenticated
    /// ones the REST users endpoint. Both converge to the same normalized
    /// snapshot.
    pub fn fetch_all(&mut self) {
        let token = self.store.auth().token().map(str::to_string);
        let result = match &token {
            Some(token) => {
                debug!("fetching via REST");
                RestSource { token }.fetch_all(&self.client, &self.transport)
            }
            None => {
                debug!("fetching via GraphQL");
                GraphqlSource.fetch_all(&self.client, &self.transport)
            }
        };
        match result {
            Ok(raw) => self.store.replace_snapshot(normalize(raw)),
            Err(err) => self.handle_error(err),
        }
    }

    /// Register a new user. Registration needs no token.
    pub fn create_user(&mut self, input: &CreateUser) {
        let result = self
            .client
            .build_create_user(input)
            .and_then(|request| Ok(self.transport.execute(request)?))
            .and_then(|response| self.client.parse_create(response));
        self.finish_create(result);
    }

    pub fn create_project(&mut self, input: &CreateProject) {
        let result = self.authed_token().and_then(|token| {
            let request = self.client.build_create_project(&token, input)?;
            let response = self.transport.execute(request)?;
            self.client.parse_create(response)
        });
        self.finish_create(result);
    }

    pub fn create_todo(&mut self, input: &CreateTodo) {
        let result = self.authed_token().and_then(|token| {
            let request = self.client.build_create_todo(&token, input)?;
            let response = self.transport.execute(request)?;
            self.client.parse_create(response)
        });
        self.finish_create(result);
    }

    /// Creation reconciles by refetching rather than inserting locally, so
    /// server-assigned fields never drift from what the views show.
    fn finish_create(&mut self, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.store.set_notice(NoticeLevel::Info, SUCCESS_NOTICE);
                self.fetch_all();
            }
            Err(err) => self.handle_error(err),
        }
    }

    /// Remove the project and every todo referencing it from local state,
    /// then issue the remote delete. A remote failure is reported but never
    /// rolled back; the next full fetch reconciles.
    pub fn delete_project(&mut self, id: i64) {
        self.store.remove_project(id);
        let result = self.authed_token().and_then(|token| {
            let request = self.client.build_delete_project(&token, id)?;
            let response = self.transport.execute(request)?;
            self.client.parse_delete(response)
        });
        if let Err(err) = result {
            self.handle_error(err);
        }
    }

    /// Remove one todo locally, then issue the remote delete. Same
    /// no-rollback policy as [`delete_project`](Session::delete_project).
    pub fn delete_todo(&mut self, id: i64) {
        self.store.remove_todo(id);
        let result = self.authed_token().and_then(|token| {
            let request = self.client.build_delete_todo(&token, id)?;
            let response = self.transport.execute(request)?;
            self.client.parse_delete(response)
        });
        if let Err(err) = result {
            self.handle_error(err);
        }
    }

    fn authed_token(&self) -> Result<String, ApiError> {
        self.store
            .auth()
            .token()
            .map(str::to_string)
            .ok_or(ApiError::Unauthorized)
    }

    /// Terminal error policy: classify, surface a notice, and on a rejected
    /// or malformed token force a logout and refetch anonymously.
    fn handle_error(&mut self, err: ApiError) {
        warn!(%err, "backend call failed");
        self.store.set_notice(NoticeLevel::Error, err.user_message());
        if err.invalidates_token() {
            self.storage.clear();
            self.store.set_anonymous();
            self.fetch_all();
        }
    }
}
