use aibro_core::AibroError;
use aibro_core::profile::UserProfile;
use aibro_core::recommendation::RecommendError;
use aibro_core::session::ChatSession;
use thiserror::Error;

use super::in_flight::InFlightGuard;

/// Reasons a user turn is not accepted.
///
/// Apart from `Store`, these are no-ops: nothing is appended or committed.
#[derive(Error, Debug, Clone)]
pub enum TurnRejected {
    #[error("message is empty")]
    EmptyText,

    #[error("no active session")]
    NoActiveSession,

    #[error("a business profile is required before recommendations can be made")]
    ProfileMissing,

    #[error("session {0} is still waiting for its previous reply")]
    InFlight(String),

    #[error(transparent)]
    Store(#[from] AibroError),
}

/// A user turn appended to the working copy of a session, awaiting its reply.
///
/// Holds the session's in-flight flag until dropped.
#[derive(Debug)]
pub struct PendingTurn {
    pub(crate) session: ChatSession,
    pub(crate) profile: UserProfile,
    pub(crate) user_text: String,
    pub(crate) first_turn: bool,
    pub(crate) _guard: InFlightGuard,
}

impl PendingTurn {
    /// Working copy, including the user message.
    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn session_id(&self) -> &str {
        &self.session.session_id
    }

    pub fn is_first_turn(&self) -> bool {
        self.first_turn
    }
}

/// How a recommendation turn ended.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// Recommendations were appended and committed.
    Delivered {
        session: ChatSession,
        /// Oracle ids skipped for lack of a catalog match
        unresolved: Vec<String>,
    },
    /// The pass failed; an apology was appended and committed.
    Apologized {
        session: ChatSession,
        error: RecommendError,
    },
    /// The session stopped being active before the reply arrived. Nothing
    /// was committed.
    Discarded { session_id: String },
}

impl TurnOutcome {
    /// The committed session, if any.
    pub fn session(&self) -> Option<&ChatSession> {
        match self {
            TurnOutcome::Delivered { session, .. } | TurnOutcome::Apologized { session, .. } => {
                Some(session)
            }
            TurnOutcome::Discarded { .. } => None,
        }
    }
}
