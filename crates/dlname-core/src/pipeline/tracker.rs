//! Per-download state: at most one rename decision per download id.
//!
//! In-flight downloads live in an arena keyed by id as
//! `Pending { attempts }`. Reaching a decision moves the id out of the arena:
//! renamed ids are remembered so later notifications are ignored, while kept
//! or abandoned ids are evicted entirely and may be looked at again.
//!
//! The renamed set is bounded: once it holds [`SETTLED_CAPACITY`] ids the
//! oldest is dropped, so a long-running session does not grow without limit.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, PoisonError};

use crate::record::DownloadId;

/// Renamed ids remembered by a default tracker.
pub const SETTLED_CAPACITY: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadState {
    Pending { attempts: u32 },
    Renamed,
}

#[derive(Debug, Default)]
struct Inner {
    pending: HashMap<DownloadId, u32>,
    renamed: HashSet<DownloadId>,
    // Insertion order of `renamed`, oldest first.
    renamed_order: VecDeque<DownloadId>,
}

/// Shared by all concurrent pipeline runs.
#[derive(Debug)]
pub struct Tracker {
    inner: Mutex<Inner>,
    settled_capacity: usize,
}

impl Default for Tracker {
    fn default() -> Self {
        Self::with_settled_capacity(SETTLED_CAPACITY)
    }
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker remembering at most `capacity` renamed ids (minimum 1).
    pub fn with_settled_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            settled_capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Claims `id` for a pipeline run. Returns false if another run holds it
    /// or it was already renamed.
    pub fn begin(&self, id: DownloadId) -> bool {
        let mut inner = self.lock();
        if inner.renamed.contains(&id) || inner.pending.contains_key(&id) {
            return false;
        }
        inner.pending.insert(id, 1);
        true
    }

    /// Counts another attempt and returns the new total.
    pub fn record_attempt(&self, id: DownloadId) -> u32 {
        let mut inner = self.lock();
        let attempts = inner.pending.entry(id).or_insert(0);
        *attempts += 1;
        *attempts
    }

    pub fn finish_renamed(&self, id: DownloadId) {
        let mut inner = self.lock();
        inner.pending.remove(&id);
        if !inner.renamed.insert(id) {
            return;
        }
        inner.renamed_order.push_back(id);
        while inner.renamed_order.len() > self.settled_capacity {
            if let Some(oldest) = inner.renamed_order.pop_front() {
                inner.renamed.remove(&oldest);
            }
        }
    }

    /// Ends a run without renaming (kept or abandoned).
    pub fn release(&self, id: DownloadId) {
        self.lock().pending.remove(&id);
    }

    pub fn state(&self, id: DownloadId) -> Option<DownloadState> {
        let inner = self.lock();
        if inner.renamed.contains(&id) {
            return Some(DownloadState::Renamed);
        }
        inner
            .pending
            .get(&id)
            .map(|&attempts| DownloadState::Pending { attempts })
    }

    pub fn in_flight(&self) -> usize {
        self.lock().pending.len()
    }

    pub fn settled(&self) -> usize {
        self.lock().renamed.len()
    }
}
