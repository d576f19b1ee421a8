//! In-memory conversation store.
//!
//! `ConversationStore` maps a caller-chosen session id to its transcript.
//! The map is a `DashMap` of `Arc<Session>`; the `Arc` is cloned out of the
//! map before any per-session lock is taken, so no `DashMap` guard is ever
//! held while a transcript is locked or across an `.await`.
//!
//! Each session carries two locks:
//! - a short-held `std::sync::Mutex` over the transcript, taken for a single
//!   push or clone and never across an `.await`;
//! - an async single-flight lock that a send-message call holds for its whole
//!   duration, so one session's send-message calls run strictly one at a time.
//!
//! State lives for the life of the process. Nothing is persisted.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use parlance_types::chat::{Role, Turn};
use parlance_types::error::ConversationError;

/// Ordered turns plus the reset counter they belong to.
#[derive(Debug, Default)]
struct Transcript {
    /// Bumped on every reset. Lets an in-flight call detect that the
    /// transcript it read from has been replaced.
    epoch: u64,
    turns: Vec<Turn>,
}

/// One started session.
///
/// Created on the first `start` for an id and reused by every later `start`
/// for the same id.
#[derive(Debug, Default)]
pub struct Session {
    transcript: Mutex<Transcript>,
    flight: tokio::sync::Mutex<()>,
}

impl Session {
    fn lock(&self) -> MutexGuard<'_, Transcript> {
        // A panic while holding the lock cannot leave a half-written turn
        // behind (push is the only mutation), so a poisoned lock is usable.
        self.transcript.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn reset(&self) {
        let mut transcript = self.lock();
        transcript.epoch += 1;
        transcript.turns.clear();
    }

    fn push(&self, turn: Turn) {
        self.lock().turns.push(turn);
    }

    fn snapshot(&self) -> Vec<Turn> {
        self.lock().turns.clone()
    }

    /// Append a turn and return the epoch it landed in together with a copy
    /// of the transcript including it.
    pub(crate) fn push_and_snapshot(&self, turn: Turn) -> (u64, Vec<Turn>) {
        let mut transcript = self.lock();
        transcript.turns.push(turn);
        (transcript.epoch, transcript.turns.clone())
    }

    /// Append a turn only if the session has not been reset since `epoch`.
    ///
    /// Returns `false` (and drops the turn) when a reset happened.
    pub(crate) fn push_if_epoch(&self, epoch: u64, turn: Turn) -> bool {
        let mut transcript = self.lock();
        if transcript.epoch != epoch {
            return false;
        }
        transcript.turns.push(turn);
        true
    }

    /// Wait for this session's single-flight slot.
    ///
    /// The guard serializes send-message calls on one session; it never
    /// blocks reads, appends, or resets.
    pub(crate) async fn begin_flight(&self) -> tokio::sync::MutexGuard<'_, ()> {
        self.flight.lock().await
    }
}

/// Process-scoped store of conversations, keyed by session id.
///
/// Constructed once at startup and shared behind an `Arc`.
#[derive(Debug, Default)]
pub struct ConversationStore {
    sessions: DashMap<String, Arc<Session>>,
}

impl ConversationStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a conversation for `session_id`.
    ///
    /// Creates an empty transcript, or clears the existing one if the
    /// session was already started. Always succeeds; returns `true` when an
    /// existing transcript was reset.
    pub fn start(&self, session_id: &str) -> bool {
        match self.sessions.entry(session_id.to_string()) {
            Entry::Occupied(entry) => {
                entry.get().reset();
                true
            }
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(Session::default()));
                false
            }
        }
    }

    /// Append one turn to the end of a started session.
    pub fn append(
        &self,
        session_id: &str,
        role: Role,
        content: impl Into<String>,
    ) -> Result<(), ConversationError> {
        self.session(session_id)?.push(Turn::new(role, content));
        Ok(())
    }

    /// Read the full transcript of a started session.
    ///
    /// The returned vector is an owned snapshot; later appends do not
    /// affect it.
    pub fn read(&self, session_id: &str) -> Result<Vec<Turn>, ConversationError> {
        Ok(self.session(session_id)?.snapshot())
    }

    /// Whether `session_id` has been started.
    #[cfg(test)]
    pub(crate) fn contains(&self, session_id: &str) -> bool {
        self.sessions.contains_key(session_id)
    }

    /// Number of started sessions.
    #[cfg(test)]
    pub(crate) fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Look up a session handle.
    ///
    /// The `Arc` is cloned so the `DashMap` guard is released on return.
    pub(crate) fn session(&self, session_id: &str) -> Result<Arc<Session>, ConversationError> {
        self.sessions
            .get(session_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| ConversationError::UnknownSession(session_id.to_string()))
    }
}
