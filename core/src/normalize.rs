//! Canonicalization of nested per-user payloads into flat collections.
//!
//! The GraphQL path returns one copy of a project per member user, so the
//! aggregated project list must be deduplicated by id before use. Both
//! collections are presented sorted by `updated` descending; `sort_by` is
//! stable, so ties keep their aggregation order.

use std::collections::HashSet;

use crate::types::{RawUser, Snapshot};

/// Produce the canonical flat view from the nested per-user shape, whichever
/// path produced it: users stripped of their relation fields, projects
/// deduplicated by id (first occurrence wins) and sorted by `updated`
/// descending, todos flattened across all users and sorted the same way.
pub fn normalize(raw: Vec<RawUser>) -> Snapshot {
    let mut users = Vec::with_capacity(raw.len());
    let mut projects = Vec::new();
    let mut todos = Vec::new();
    let mut seen_projects = HashSet::new();

    for entry in raw {
        for project in entry.user_projects {
            if seen_projects.insert(project.id) {
                projects.push(project);
            }
        }
        todos.extend(entry.user_todos);
        users.push(entry.user);
    }

    projects.sort_by(|a, b| b.updated.cmp(&a.updated));
    todos.sort_by(|a, b| b.updated.cmp(&a.updated));

    Snapshot {
        users,
        projects,
        todos,
    }
}
