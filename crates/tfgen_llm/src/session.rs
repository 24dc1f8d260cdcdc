//! Append-only conversation history keyed by session id.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::types::{Message, SessionId};

/// Shared session store.
///
/// Cloning yields a handle to the same store. History is only ever
/// appended to, one complete turn (prompt and reply) at a time.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionId, Vec<Message>>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prior messages of a session; empty for unknown sessions.
    pub fn history(&self, session_id: &str) -> Vec<Message> {
        self.sessions
            .read()
            .get(session_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Append a completed turn to a session, creating it on first use.
    pub fn append_turn(&self, session_id: &str, prompt: Message, reply: Message) {
        let mut sessions = self.sessions.write();
        let history = sessions.entry(session_id.to_string()).or_default();
        history.push(prompt);
        history.push(reply);
        debug!(session = %session_id, messages = history.len(), "Session turn recorded");
    }

    pub fn message_count(&self, session_id: &str) -> usize {
        self.sessions.read().get(session_id).map_or(0, Vec::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        store.append_turn("a", Message::user("hi"), Message::assistant("hello"));
        store.append_turn("a", Message::user("again"), Message::assistant("yes"));
        store.append_turn("b", Message::user("other"), Message::assistant("ok"));

        assert_eq!(store.message_count("a"), 4);
        assert_eq!(store.message_count("b"), 2);
        assert_eq!(store.message_count("c"), 0);
        assert_eq!(store.history("a")[2].content, "again");
    }

    #[test]
    fn test_clone_shares_state() {
        let store = SessionStore::new();
        let handle = store.clone();
        handle.append_turn("s", Message::user("p"), Message::assistant("r"));
        assert_eq!(store.message_count("s"), 2);
    }
}
