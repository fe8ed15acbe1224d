use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Set of sessions with a recommendation turn in progress.
#[derive(Debug, Clone, Default)]
pub struct InFlightTurns {
    sessions: Arc<Mutex<HashSet<String>>>,
}

impl InFlightTurns {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `session_id` busy. Returns `None` if it already is.
    pub fn try_acquire(&self, session_id: &str) -> Option<InFlightGuard> {
        let mut sessions = self.lock();
        if !sessions.insert(session_id.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            sessions: Arc::clone(&self.sessions),
            session_id: session_id.to_string(),
        })
    }

    pub fn is_in_flight(&self, session_id: &str) -> bool {
        self.lock().contains(session_id)
    }

    // The set stays consistent even if a holder panicked, so poisoning is ignored.
    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears the in-flight flag of its session when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    sessions: Arc<Mutex<HashSet<String>>>,
    session_id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut sessions = self
            .sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        sessions.remove(&self.session_id);
    }
}
