//! The single shared state snapshot behind all views.
//!
//! # Design
//! Rather than ambient globals, all client state lives in one `Store` with a
//! closed set of mutation entry points. Every mutation replaces the affected
//! collections in one assignment and then notifies subscribers, so a
//! rendering layer always observes a complete snapshot, never a half-applied
//! one. Single-threaded by design: mutations go through `&mut self`.

use crate::types::Snapshot;

/// Authentication state machine. The only transitions are
/// Anonymous → Authenticated on a successful sign-in and
/// Authenticated → Anonymous on sign-out or a rejected token.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated {
        token: String,
        login: String,
    },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated { .. })
    }

    /// The current token, when authenticated.
    pub fn token(&self) -> Option<&str> {
        match self {
            AuthState::Anonymous => None,
            AuthState::Authenticated { token, .. } => Some(token),
        }
    }
}

/// Severity of a user-facing notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Ephemeral text surfaced to the user after an operation. Replaced by the
/// next operation's notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

type Listener = Box<dyn Fn(&Snapshot)>;

/// Observable store holding the snapshot, auth state and current notice.
#[derive(Default)]
pub struct Store {
    snapshot: Snapshot,
    auth: AuthState,
    notice: Option<Notice>,
    listeners: Vec<(u64, Listener)>,
    next_listener_id: u64,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Register a listener invoked after every snapshot change. Returns an
    /// id usable with [`unsubscribe`](Store::unsubscribe).
    pub fn subscribe(&mut self, listener: impl Fn(&Snapshot) + 'static) -> u64 {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: u64) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.snapshot);
        }
    }

    /// Replace the whole snapshot, the reconciliation entry point after a
    /// full fetch.
    pub fn replace_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.notify();
    }

    /// Optimistically remove a project and every todo referencing it. Runs
    /// synchronously, before the remote delete is issued; the next full
    /// fetch reconciles any divergence.
    pub fn remove_project(&mut self, id: i64) {
        self.snapshot.projects.retain(|project| project.id != id);
        self.snapshot.todos.retain(|todo| todo.project != id);
        self.notify();
    }

    /// Optimistically remove a single todo.
    pub fn remove_todo(&mut self, id: i64) {
        self.snapshot.todos.retain(|todo| todo.id != id);
        self.notify();
    }

    pub fn set_authenticated(&mut self, token: String, login: String) {
        self.auth = AuthState::Authenticated { token, login };
    }

    pub fn set_anonymous(&mut self) {
        self.auth = AuthState::Anonymous;
    }

    pub fn set_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notice = Some(Notice {
            level,
            text: text.into(),
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }
}
