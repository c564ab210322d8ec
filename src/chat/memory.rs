use std::collections::VecDeque;
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use crate::models::{Scheme, UserProfile};

/// Maximum number of concurrently tracked sessions before the least recently
/// used one is evicted.
pub const DEFAULT_MAX_SESSIONS: usize = 1000;

/// Maximum turns kept per session; older turns are silently dropped.
pub const DEFAULT_MAX_HISTORY: usize = 20;

/// One conversation turn.
#[derive(Debug, Clone)]
pub struct Turn {
    pub user: String,
    pub bot: String,
    pub intent: Option<String>,
}

/// Accumulated per-session state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub history: VecDeque<Turn>,
    pub user_info: UserProfile,
    pub last_schemes_shown: Vec<Scheme>,
    pub last_intent: Option<String>,
    pub turn_count: u64,
}

/// Per-session conversation store.
///
/// Sessions are created on first reference and are fully independent of each
/// other. The store is bounded: least-recently-used sessions are evicted once
/// the capacity is reached, and each session's history is a bounded FIFO.
/// Only `turn_count` grows without bound. A single lock serializes writers;
/// every operation is a short in-memory critical section.
pub struct ConversationMemory {
    sessions: Mutex<LruCache<String, SessionState>>,
    max_history: usize,
}

impl ConversationMemory {
    pub fn new(max_sessions: usize, max_history: usize) -> Self {
        let capacity = NonZeroUsize::new(max_sessions.max(1)).unwrap_or(NonZeroUsize::MIN);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            max_history,
        }
    }

    fn with_session<R>(&self, session_id: &str, f: impl FnOnce(&mut SessionState) -> R) -> R {
        let mut sessions = self.sessions.lock();
        let session = sessions.get_or_insert_mut(session_id.to_string(), SessionState::default);
        f(session)
    }

    /// Snapshot of a session's state, creating the session if absent.
    pub fn get_session(&self, session_id: &str) -> SessionState {
        self.with_session(session_id, |session| session.clone())
    }

    /// Record a completed turn and bound the history FIFO.
    pub fn add_turn(
        &self,
        session_id: &str,
        user_msg: &str,
        bot_response: &str,
        intent: Option<&str>,
    ) {
        self.with_session(session_id, |session| {
            session.history.push_back(Turn {
                user: user_msg.to_string(),
                bot: bot_response.to_string(),
                intent: intent.map(str::to_string),
            });
            session.turn_count += 1;
            session.last_intent = intent.map(str::to_string);

            while session.history.len() > self.max_history {
                session.history.pop_front();
            }
        });
    }

    /// Field-wise merge of extracted profile fragments; new values overwrite
    /// old ones for the same field.
    pub fn update_user_info(&self, session_id: &str, fragment: &UserProfile) {
        self.with_session(session_id, |session| {
            session.user_info.merge_from(fragment);
        });
    }

    /// Remember the ordered scheme list last shown to the user, for
    /// positional follow-ups like "tell me about #2".
    pub fn set_last_schemes(&self, session_id: &str, schemes: Vec<Scheme>) {
        self.with_session(session_id, |session| {
            session.last_schemes_shown = schemes;
        });
    }

    pub fn get_user_info(&self, session_id: &str) -> UserProfile {
        self.with_session(session_id, |session| session.user_info.clone())
    }

    pub fn get_last_schemes(&self, session_id: &str) -> Vec<Scheme> {
        self.with_session(session_id, |session| session.last_schemes_shown.clone())
    }

    pub fn get_last_intent(&self, session_id: &str) -> Option<String> {
        self.with_session(session_id, |session| session.last_intent.clone())
    }

    pub fn get_turn_count(&self, session_id: &str) -> u64 {
        self.with_session(session_id, |session| session.turn_count)
    }

    /// Delete all state for a session. The id may be reused afterwards and
    /// starts fresh.
    pub fn clear_session(&self, session_id: &str) {
        self.sessions.lock().pop(session_id);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().len()
    }
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSIONS, DEFAULT_MAX_HISTORY)
    }
}
