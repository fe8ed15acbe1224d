//! Recommendation session use case.
//!
//! `RecommendationUseCase` owns the lifecycle of chat sessions: creating them
//! with a welcome message, accepting user turns, running the ranking oracle
//! over the profile's candidates and committing the reply.

use std::sync::Arc;

use aibro_core::catalog::{Catalog, Category};
use aibro_core::error::{AibroError, Result};
use aibro_core::id::IdProvider;
use aibro_core::oracle::RankingOracle;
use aibro_core::profile::{ProfileRepository, UserProfile};
use aibro_core::recommendation::{
    DEFAULT_CANDIDATE_CAP, LookupMissPolicy, MergeOutcome, RecommendError, build_candidates,
    merge_rankings,
};
use aibro_core::session::{ChatSession, Message, SessionRepository};
use aibro_core::store::DurableStore;
use aibro_infrastructure::AppConfig;
use tokio::sync::RwLock;

use crate::session::{InFlightTurns, PendingTurn, TurnOutcome, TurnRejected};
use crate::texts;

/// Tunables of a recommendation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendationOptions {
    /// Maximum number of candidates sent to the oracle
    pub candidate_cap: usize,
    pub lookup_miss: LookupMissPolicy,
    /// Restricts candidates to one category when set
    pub candidate_category: Option<Category>,
}

impl Default for RecommendationOptions {
    fn default() -> Self {
        Self {
            candidate_cap: DEFAULT_CANDIDATE_CAP,
            lookup_miss: LookupMissPolicy::default(),
            candidate_category: None,
        }
    }
}

impl RecommendationOptions {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            candidate_cap: config.recommendation.candidate_cap,
            lookup_miss: config.recommendation.lookup_miss,
            candidate_category: config.recommendation.candidate_category,
        }
    }
}

/// Session orchestrator.
///
/// # Turn protocol
///
/// A turn is two steps: [`append_user_turn`](Self::append_user_turn) checks
/// the preconditions and appends the user message to a working copy, then
/// [`produce_recommendation`](Self::produce_recommendation) asks the oracle
/// and commits the session wholesale. [`send`](Self::send) runs both.
///
/// Only one turn per session may be pending. A reply whose session is no
/// longer the active one is discarded.
pub struct RecommendationUseCase {
    catalog: Arc<Catalog>,
    profile_repository: Arc<dyn ProfileRepository>,
    session_repository: Arc<dyn SessionRepository>,
    oracle: Arc<dyn RankingOracle>,
    ids: Arc<dyn IdProvider>,
    options: RecommendationOptions,
    active_session_id: RwLock<Option<String>>,
    in_flight: InFlightTurns,
}

impl RecommendationUseCase {
    pub fn new<S>(
        catalog: Arc<Catalog>,
        store: Arc<S>,
        oracle: Arc<dyn RankingOracle>,
        ids: Arc<dyn IdProvider>,
    ) -> Self
    where
        S: DurableStore + 'static,
    {
        Self {
            catalog,
            profile_repository: store.clone(),
            session_repository: store,
            oracle,
            ids,
            options: RecommendationOptions::default(),
            active_session_id: RwLock::new(None),
            in_flight: InFlightTurns::new(),
        }
    }

    pub fn with_options(mut self, options: RecommendationOptions) -> Self {
        self.options = options;
        self
    }

    pub async fn active_session_id(&self) -> Option<String> {
        self.active_session_id.read().await.clone()
    }

    /// Creates, commits and activates a new session.
    ///
    /// The welcome message references `profile` when given and asks the user
    /// to complete a profile otherwise. The snapshot falls back to
    /// [`UserProfile::placeholder`].
    pub async fn create_session(&self, profile: Option<&UserProfile>) -> Result<ChatSession> {
        let session_id = self.ids.next_id();
        let welcome = Message::assistant(self.ids.next_id(), texts::welcome(profile));
        let snapshot = profile.cloned().unwrap_or_else(UserProfile::placeholder);
        let session = ChatSession::new(session_id.clone(), snapshot, welcome);

        self.session_repository.upsert(&session).await?;
        *self.active_session_id.write().await = Some(session_id.clone());

        tracing::info!(
            session_id = %session_id,
            has_profile = profile.is_some(),
            "[RecommendationUseCase] Session created"
        );
        Ok(session)
    }

    /// Creates a session for the currently stored profile.
    pub async fn start_session(&self) -> Result<ChatSession> {
        let profile = self.profile_repository.get_profile().await?;
        self.create_session(profile.as_ref()).await
    }

    /// Loads a stored session and makes it active.
    pub async fn open_session(&self, session_id: &str) -> Result<ChatSession> {
        let session = self
            .session_repository
            .find_by_id(session_id)
            .await?
            .ok_or_else(|| AibroError::not_found("session", session_id))?;

        *self.active_session_id.write().await = Some(session_id.to_string());
        tracing::info!("[RecommendationUseCase] Switched to session: {}", session_id);
        Ok(session)
    }

    /// Stored sessions, most recent first.
    pub async fn list_sessions(&self) -> Result<Vec<ChatSession>> {
        self.session_repository.list_all().await
    }

    /// Deletes a session. Deleting an unknown id is a no-op.
    pub async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.session_repository.delete(session_id).await?;

        let mut active = self.active_session_id.write().await;
        if active.as_deref() == Some(session_id) {
            *active = None;
        }
        tracing::info!("[RecommendationUseCase] Session deleted: {}", session_id);
        Ok(())
    }

    /// Appends a user message to the active session's working copy.
    ///
    /// Nothing is persisted here; the session is committed once the reply
    /// has been produced.
    pub async fn append_user_turn(
        &self,
        text: &str,
    ) -> std::result::Result<PendingTurn, TurnRejected> {
        if text.trim().is_empty() {
            return Err(TurnRejected::EmptyText);
        }

        let session_id = self
            .active_session_id()
            .await
            .ok_or(TurnRejected::NoActiveSession)?;

        let profile = self
            .profile_repository
            .get_profile()
            .await?
            .ok_or(TurnRejected::ProfileMissing)?;

        let guard = self
            .in_flight
            .try_acquire(&session_id)
            .ok_or_else(|| TurnRejected::InFlight(session_id.clone()))?;

        let mut session = self
            .session_repository
            .find_by_id(&session_id)
            .await?
            .ok_or_else(|| AibroError::not_found("session", session_id.as_str()))?;

        let first_turn = session.messages.len() <= 1;
        session.append(Message::user(self.ids.next_id(), text));

        tracing::debug!(
            session_id = %session_id,
            first_turn,
            "[RecommendationUseCase] User turn appended"
        );
        Ok(PendingTurn {
            session,
            profile,
            user_text: text.to_string(),
            first_turn,
            _guard: guard,
        })
    }

    /// Produces the assistant reply for a pending turn and commits the session.
    ///
    /// Oracle and merge failures never surface here: they become a single
    /// apology message. Only store failures are returned as errors.
    pub async fn produce_recommendation(&self, pending: PendingTurn) -> Result<TurnOutcome> {
        let PendingTurn {
            mut session,
            profile,
            user_text,
            first_turn,
            _guard,
        } = pending;

        if first_turn {
            self.summarize_title(&mut session, &user_text).await;
        }

        let result = self.recommend(&profile).await;

        if self.active_session_id().await.as_deref() != Some(session.session_id.as_str()) {
            tracing::info!(
                session_id = %session.session_id,
                "[RecommendationUseCase] Session no longer active, discarding reply"
            );
            return Ok(TurnOutcome::Discarded {
                session_id: session.session_id,
            });
        }

        let outcome = match result {
            Ok(merged) => {
                let reply = Message::assistant(
                    self.ids.next_id(),
                    texts::recommendations_found(merged.recommendations.len()),
                )
                .with_recommendations(merged.recommendations);
                session.append(reply);
                self.session_repository.upsert(&session).await?;
                TurnOutcome::Delivered {
                    session,
                    unresolved: merged.unresolved,
                }
            }
            Err(error) => {
                tracing::warn!(
                    session_id = %session.session_id,
                    error = %error,
                    "[RecommendationUseCase] Recommendation failed"
                );
                session.append(Message::assistant(self.ids.next_id(), texts::APOLOGY));
                self.session_repository.upsert(&session).await?;
                TurnOutcome::Apologized { session, error }
            }
        };
        Ok(outcome)
    }

    /// Runs a complete turn on the active session.
    pub async fn send(&self, text: &str) -> anyhow::Result<TurnOutcome> {
        let pending = self.append_user_turn(text).await?;
        Ok(self.produce_recommendation(pending).await?)
    }

    /// Replaces the placeholder title. Failures keep the placeholder.
    async fn summarize_title(&self, session: &mut ChatSession, text: &str) {
        match self.oracle.summarize_title(text).await {
            Ok(raw) => match texts::clean_title(&raw) {
                Some(title) => session.set_title(title),
                None => tracing::debug!("[RecommendationUseCase] Oracle returned an empty title"),
            },
            Err(e) => {
                tracing::warn!(error = %e, "[RecommendationUseCase] Title summarization failed");
            }
        }
    }

    async fn recommend(
        &self,
        profile: &UserProfile,
    ) -> std::result::Result<MergeOutcome, RecommendError> {
        let candidates = build_candidates(
            &self.catalog,
            profile,
            self.options.candidate_category,
            self.options.candidate_cap,
        );
        tracing::debug!(
            region = %profile.region,
            candidates = candidates.len(),
            "[RecommendationUseCase] Candidates built"
        );
        if candidates.is_empty() {
            return Ok(MergeOutcome::default());
        }

        let records = self.oracle.rank(profile, &candidates).await?;
        merge_rankings(&candidates, &records, self.options.lookup_miss)
    }
}
