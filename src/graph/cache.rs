//! Session-scoped asset cache
//!
//! Memo table keyed by asset identity. Only the resolver touches it. An entry
//! moves from in-progress to exactly one of done or failed and never back.

use crate::asset::{Asset, AssetId};
use crate::error::ResolveError;
use std::collections::HashMap;
use std::sync::Arc;

/// How a done asset was satisfied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Generated,
    Loaded,
}

impl Origin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Origin::Generated => "generated",
            Origin::Loaded => "loaded",
        }
    }
}

/// Cache entry state.
#[derive(Clone)]
pub enum Status {
    InProgress,
    Done {
        asset: Arc<dyn Asset>,
        origin: Origin,
    },
    Failed(ResolveError),
}

struct Entry {
    name: String,
    status: Status,
}

/// Identity-keyed memo table for one resolution session.
#[derive(Default)]
pub struct AssetCache {
    entries: HashMap<AssetId, Entry>,
    /// Keys in the order they became done.
    completed: Vec<String>,
}

impl AssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookup(&self, id: &AssetId) -> Option<&Status> {
        self.entries.get(id).map(|entry| &entry.status)
    }

    /// Name recorded for `id` when it was first marked.
    pub fn name_of(&self, id: &AssetId) -> Option<&str> {
        self.entries.get(id).map(|entry| entry.name.as_str())
    }

    /// Claim `id` for building. Returns `false` if another build already
    /// claimed it; the first writer wins and the entry is left untouched.
    pub fn mark_in_progress(&mut self, id: &AssetId, name: &str) -> bool {
        if self.entries.contains_key(id) {
            return false;
        }
        self.entries.insert(
            id.clone(),
            Entry {
                name: name.to_string(),
                status: Status::InProgress,
            },
        );
        true
    }

    pub fn mark_done(&mut self, id: &AssetId, asset: Arc<dyn Asset>, origin: Origin) {
        self.transition(id, Status::Done { asset, origin });
        self.completed.push(id.key().to_string());
    }

    pub fn mark_failed(&mut self, id: &AssetId, error: ResolveError) {
        self.transition(id, Status::Failed(error));
    }

    fn transition(&mut self, id: &AssetId, status: Status) {
        match self.entries.get_mut(id) {
            Some(entry) => {
                debug_assert!(
                    matches!(entry.status, Status::InProgress),
                    "asset {} left a terminal state",
                    id
                );
                entry.status = status;
            }
            None => {
                // Reached only if a caller skipped mark_in_progress.
                self.entries.insert(
                    id.clone(),
                    Entry {
                        name: id.key().to_string(),
                        status,
                    },
                );
            }
        }
    }

    /// Keys of done assets, in completion order.
    pub fn completed(&self) -> &[String] {
        &self.completed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
