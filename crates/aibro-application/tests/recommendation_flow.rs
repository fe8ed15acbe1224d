//! End-to-end turns through the session orchestrator with a scripted oracle.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use aibro_application::{RecommendationOptions, RecommendationUseCase, TurnOutcome, TurnRejected};
use aibro_application::texts::APOLOGY;
use aibro_core::catalog::{Announcement, Catalog};
use aibro_core::id::SequentialIdProvider;
use aibro_core::oracle::{OracleError, RankingOracle, RankingRecord};
use aibro_core::profile::{ProfileRepository, UserProfile};
use aibro_core::recommendation::{LookupMissPolicy, RecommendError};
use aibro_core::session::{MessageRole, PLACEHOLDER_TITLE, SessionRepository};
use aibro_infrastructure::InMemoryStore;
use async_trait::async_trait;
use serde_json::json;

type RankResult = Result<Vec<RankingRecord>, OracleError>;

struct ScriptedOracle {
    rankings: Mutex<VecDeque<RankResult>>,
    title: Result<String, OracleError>,
    seen_candidates: Mutex<Vec<Vec<String>>>,
    title_calls: AtomicUsize,
}

impl ScriptedOracle {
    fn new(rankings: Vec<RankResult>) -> Self {
        Self {
            rankings: Mutex::new(rankings.into()),
            title: Ok("\"Loan hunt\"".to_string()),
            seen_candidates: Mutex::new(Vec::new()),
            title_calls: AtomicUsize::new(0),
        }
    }

    fn with_title(mut self, title: Result<String, OracleError>) -> Self {
        self.title = title;
        self
    }

    fn seen_candidates(&self) -> Vec<Vec<String>> {
        self.seen_candidates.lock().unwrap().clone()
    }

    fn title_calls(&self) -> usize {
        self.title_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RankingOracle for ScriptedOracle {
    async fn rank(&self, _profile: &UserProfile, candidates: &[Announcement]) -> RankResult {
        self.seen_candidates
            .lock()
            .unwrap()
            .push(candidates.iter().map(|c| c.policy_id.clone()).collect());
        self.rankings
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn summarize_title(&self, _text: &str) -> Result<String, OracleError> {
        self.title_calls.fetch_add(1, Ordering::SeqCst);
        self.title.clone()
    }
}

fn record(id: &str, score: f64) -> RankingRecord {
    RankingRecord {
        id: id.to_string(),
        score,
        reason: format!("The owner is in gyeonggi, {id} accepts it"),
        checklist: vec![
            "business registration".to_string(),
            "tax clearance".to_string(),
            "revenue proof".to_string(),
        ],
        risk_note: Some("deadline may be near".to_string()),
    }
}

fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::from_raw(&[
        json!({"policy_id": "L001", "title": "Market Loan", "category": "loan", "region": "nationwide"}),
        json!({"policy_id": "L002", "title": "Gyeonggi Hope Loan", "category": "loan", "region": "gyeonggi"}),
        json!({"policy_id": "L003", "title": "Seoul Emergency Fund", "category": "loan", "region": "seoul"}),
    ]))
}

fn profile() -> UserProfile {
    UserProfile {
        region: "gyeonggi".to_string(),
        industry: "manufacturing".to_string(),
        employees: 3,
        opening_date: "2022-06-01".to_string(),
        revenue: "50000000".to_string(),
    }
}

struct Harness {
    store: Arc<InMemoryStore>,
    oracle: Arc<ScriptedOracle>,
    usecase: RecommendationUseCase,
}

fn harness(oracle: ScriptedOracle, store: InMemoryStore) -> Harness {
    let store = Arc::new(store);
    let oracle = Arc::new(oracle);
    let usecase = RecommendationUseCase::new(
        catalog(),
        store.clone(),
        oracle.clone(),
        Arc::new(SequentialIdProvider::new("id")),
    );
    Harness {
        store,
        oracle,
        usecase,
    }
}

fn with_profile(oracle: ScriptedOracle) -> Harness {
    harness(oracle, InMemoryStore::with_profile(profile()))
}

#[tokio::test]
async fn test_create_session_with_and_without_profile() {
    let h = with_profile(ScriptedOracle::new(vec![]));

    let anonymous = h.usecase.create_session(None).await.unwrap();
    assert_eq!(anonymous.messages.len(), 1);
    assert_eq!(anonymous.messages[0].role, MessageRole::Assistant);
    assert!(anonymous.messages[0].content.contains("complete your business profile"));
    assert_eq!(anonymous.profile_snapshot, UserProfile::placeholder());
    assert_eq!(anonymous.title, PLACEHOLDER_TITLE);

    let p = profile();
    let known = h.usecase.create_session(Some(&p)).await.unwrap();
    assert!(known.messages[0].content.contains(&p.region));
    assert!(known.messages[0].content.contains(&p.industry));
    assert_eq!(known.profile_snapshot, p);

    // Most recent first; the latest session is active.
    let listed = h.usecase.list_sessions().await.unwrap();
    assert_eq!(listed[0].session_id, known.session_id);
    assert_eq!(h.usecase.active_session_id().await, Some(known.session_id));
}

#[tokio::test]
async fn test_session_ids_are_unique() {
    let h = with_profile(ScriptedOracle::new(vec![]));
    let mut ids = HashSet::new();
    for _ in 0..25 {
        ids.insert(h.usecase.create_session(None).await.unwrap().session_id);
    }
    assert_eq!(ids.len(), 25);
    assert_eq!(h.usecase.list_sessions().await.unwrap().len(), 25);
}

#[tokio::test]
async fn test_snapshot_ignores_later_profile_edits() {
    let h = with_profile(ScriptedOracle::new(vec![]));
    let session = h.usecase.start_session().await.unwrap();

    let edited = UserProfile {
        region: "busan".to_string(),
        ..profile()
    };
    h.store.save_profile(&edited).await.unwrap();

    let stored = h.store.find_by_id(&session.session_id).await.unwrap().unwrap();
    assert_eq!(stored.profile_snapshot, profile());
}

#[tokio::test]
async fn test_delete_session_is_idempotent() {
    let h = with_profile(ScriptedOracle::new(vec![]));
    let kept = h.usecase.create_session(None).await.unwrap();
    let doomed = h.usecase.create_session(None).await.unwrap();

    h.usecase.delete_session("never-existed").await.unwrap();
    assert_eq!(h.usecase.list_sessions().await.unwrap().len(), 2);

    h.usecase.delete_session(&doomed.session_id).await.unwrap();
    h.usecase.delete_session(&doomed.session_id).await.unwrap();
    let remaining = h.usecase.list_sessions().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].session_id, kept.session_id);
}

#[tokio::test]
async fn test_open_missing_session_is_not_found() {
    let h = with_profile(ScriptedOracle::new(vec![]));
    let err = h.usecase.open_session("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_append_user_turn_only_grows_messages() {
    let h = with_profile(ScriptedOracle::new(vec![]));
    let before = h.usecase.create_session(Some(&profile())).await.unwrap();

    let pending = h.usecase.append_user_turn("need working capital").await.unwrap();
    let after = pending.session();

    assert_eq!(after.messages.len(), before.messages.len() + 1);
    assert_eq!(&after.messages[..before.messages.len()], &before.messages[..]);
    let last = after.last_message().unwrap();
    assert_eq!(last.role, MessageRole::User);
    assert_eq!(last.content, "need working capital");
    assert!(pending.is_first_turn());

    // Nothing is committed until the reply is produced.
    let stored = h.store.find_by_id(&before.session_id).await.unwrap().unwrap();
    assert_eq!(stored, before);
}

#[tokio::test]
async fn test_append_user_turn_rejections() {
    let h = harness(ScriptedOracle::new(vec![]), InMemoryStore::new());

    assert!(matches!(
        h.usecase.append_user_turn("hello").await,
        Err(TurnRejected::NoActiveSession)
    ));

    let session = h.usecase.create_session(None).await.unwrap();
    assert!(matches!(
        h.usecase.append_user_turn("   ").await,
        Err(TurnRejected::EmptyText)
    ));
    assert!(matches!(
        h.usecase.append_user_turn("hello").await,
        Err(TurnRejected::ProfileMissing)
    ));

    h.store.save_profile(&profile()).await.unwrap();
    let pending = h.usecase.append_user_turn("hello").await.unwrap();
    assert!(matches!(
        h.usecase.append_user_turn("again").await,
        Err(TurnRejected::InFlight(id)) if id == session.session_id
    ));

    // Releasing the pending turn frees the session.
    drop(pending);
    assert!(h.usecase.append_user_turn("again").await.is_ok());

    let stored = h.store.find_by_id(&session.session_id).await.unwrap().unwrap();
    assert_eq!(stored.messages.len(), 1);
}

#[tokio::test]
async fn test_recommendations_sorted_by_score() {
    let h = with_profile(ScriptedOracle::new(vec![Ok(vec![
        record("L002", 60.0),
        record("L001", 90.0),
    ])]));
    let created = h.usecase.create_session(Some(&profile())).await.unwrap();

    let outcome = h.usecase.send("find me a loan").await.unwrap();
    let TurnOutcome::Delivered { session, unresolved } = outcome else {
        panic!("expected recommendations");
    };
    assert!(unresolved.is_empty());

    // Candidates are the profile's region plus nationwide entries.
    assert_eq!(
        h.oracle.seen_candidates(),
        vec![vec!["L001".to_string(), "L002".to_string()]]
    );

    let reply = session.last_message().unwrap();
    assert_eq!(reply.role, MessageRole::Assistant);
    assert!(reply.content.contains("found 2 "));
    let recs = reply.recommendations.as_ref().unwrap();
    let ranked: Vec<_> = recs
        .iter()
        .map(|a| (a.policy_id.as_str(), a.score))
        .collect();
    assert_eq!(ranked, vec![("L001", Some(90.0)), ("L002", Some(60.0))]);
    assert_eq!(recs[0].title, "Market Loan");
    assert_eq!(recs[0].checklist.as_ref().map(Vec::len), Some(3));

    // Welcome, user, reply; committed and titled.
    assert_eq!(session.messages.len(), 3);
    assert_eq!(session.title, "Loan hunt");
    assert!(session.updated_at >= created.updated_at);
    let stored = h.store.find_by_id(&session.session_id).await.unwrap().unwrap();
    assert_eq!(stored, session);
}

#[tokio::test]
async fn test_oracle_failure_appends_single_apology() {
    let h = with_profile(ScriptedOracle::new(vec![Err(OracleError::request(
        "connection reset",
    ))]));
    let created = h.usecase.create_session(Some(&profile())).await.unwrap();

    let outcome = h.usecase.send("anything?").await.unwrap();
    let TurnOutcome::Apologized { session, error } = outcome else {
        panic!("expected an apology");
    };
    assert!(matches!(error, RecommendError::Oracle(_)));

    assert_eq!(session.messages.len(), created.messages.len() + 2);
    let new_assistant: Vec<_> = session.messages[created.messages.len()..]
        .iter()
        .filter(|m| m.role == MessageRole::Assistant)
        .collect();
    assert_eq!(new_assistant.len(), 1);
    assert_eq!(new_assistant[0].content, APOLOGY);
    assert!(new_assistant[0].recommendations.is_none());

    let stored = h.store.find_by_id(&session.session_id).await.unwrap().unwrap();
    assert_eq!(stored, session);
}

#[tokio::test]
async fn test_malformed_payload_is_an_apology() {
    let h = with_profile(ScriptedOracle::new(vec![Err(OracleError::MalformedPayload(
        "not JSON".to_string(),
    ))]));
    h.usecase.create_session(Some(&profile())).await.unwrap();

    let outcome = h.usecase.send("anything?").await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Apologized { .. }));
}

#[tokio::test]
async fn test_title_failure_keeps_placeholder() {
    let oracle = ScriptedOracle::new(vec![Ok(vec![record("L001", 80.0)])])
        .with_title(Err(OracleError::EmptyResponse));
    let h = with_profile(oracle);
    h.usecase.create_session(Some(&profile())).await.unwrap();

    let outcome = h.usecase.send("hi").await.unwrap();
    let session = outcome.session().unwrap();
    assert_eq!(session.title, PLACEHOLDER_TITLE);
    assert!(matches!(outcome, TurnOutcome::Delivered { .. }));
}

#[tokio::test]
async fn test_title_is_only_summarized_on_first_turn() {
    let h = with_profile(ScriptedOracle::new(vec![
        Ok(vec![record("L001", 80.0)]),
        Ok(vec![record("L002", 70.0)]),
    ]));
    h.usecase.create_session(Some(&profile())).await.unwrap();

    h.usecase.send("first").await.unwrap();
    let outcome = h.usecase.send("second").await.unwrap();

    assert_eq!(h.oracle.title_calls(), 1);
    let session = outcome.session().unwrap();
    assert_eq!(session.user_message_count(), 2);
    assert_eq!(session.messages.len(), 5);
}

#[tokio::test]
async fn test_unresolved_ids_are_skipped_by_default() {
    let h = with_profile(ScriptedOracle::new(vec![Ok(vec![
        record("GHOST", 99.0),
        record("L001", 50.0),
    ])]));
    h.usecase.create_session(Some(&profile())).await.unwrap();

    let outcome = h.usecase.send("hi").await.unwrap();
    let TurnOutcome::Delivered { session, unresolved } = outcome else {
        panic!("expected recommendations");
    };
    assert_eq!(unresolved, vec!["GHOST".to_string()]);
    let recs = session.last_message().unwrap().recommendations.clone().unwrap();
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].policy_id, "L001");
}

#[tokio::test]
async fn test_catalog_entry_not_offered_is_never_recommended() {
    let h = with_profile(ScriptedOracle::new(vec![Ok(vec![record("L003", 95.0)])]));
    h.usecase.create_session(Some(&profile())).await.unwrap();

    let outcome = h.usecase.send("anything in seoul?").await.unwrap();
    assert_eq!(
        h.oracle.seen_candidates(),
        vec![vec!["L001".to_string(), "L002".to_string()]]
    );
    let TurnOutcome::Delivered { session, unresolved } = outcome else {
        panic!("expected delivery");
    };
    assert_eq!(unresolved, vec!["L003".to_string()]);
    let recs = session.last_message().unwrap().recommendations.clone().unwrap();
    assert!(recs.is_empty());
    assert!(session.last_message().unwrap().content.contains("found 0"));
}

#[tokio::test]
async fn test_unresolved_ids_rejected_when_configured() {
    let store = Arc::new(InMemoryStore::with_profile(profile()));
    let oracle = Arc::new(ScriptedOracle::new(vec![Ok(vec![
        record("L001", 50.0),
        record("GHOST", 99.0),
    ])]));
    let usecase = RecommendationUseCase::new(
        catalog(),
        store.clone(),
        oracle,
        Arc::new(SequentialIdProvider::new("id")),
    )
    .with_options(RecommendationOptions {
        lookup_miss: LookupMissPolicy::Reject,
        ..RecommendationOptions::default()
    });
    usecase.create_session(Some(&profile())).await.unwrap();

    let outcome = usecase.send("hi").await.unwrap();
    let TurnOutcome::Apologized { session, error } = outcome else {
        panic!("expected an apology");
    };
    assert_eq!(
        error,
        RecommendError::LookupMiss {
            ids: vec!["GHOST".to_string()]
        }
    );
    assert!(session.last_message().unwrap().recommendations.is_none());
}

#[tokio::test]
async fn test_candidate_cap_bounds_oracle_request() {
    let store = Arc::new(InMemoryStore::with_profile(profile()));
    let oracle = Arc::new(ScriptedOracle::new(vec![]));
    let usecase = RecommendationUseCase::new(
        catalog(),
        store,
        oracle.clone(),
        Arc::new(SequentialIdProvider::new("id")),
    )
    .with_options(RecommendationOptions {
        candidate_cap: 1,
        ..RecommendationOptions::default()
    });
    usecase.create_session(Some(&profile())).await.unwrap();
    usecase.send("hi").await.unwrap();

    assert_eq!(oracle.seen_candidates(), vec![vec!["L001".to_string()]]);
}

#[tokio::test]
async fn test_reply_for_inactive_session_is_discarded() {
    let h = with_profile(ScriptedOracle::new(vec![Ok(vec![record("L001", 90.0)])]));
    let first = h.usecase.create_session(Some(&profile())).await.unwrap();

    let pending = h.usecase.append_user_turn("find me a loan").await.unwrap();
    // The user moves to another session before the reply arrives.
    let second = h.usecase.create_session(Some(&profile())).await.unwrap();

    let outcome = h.usecase.produce_recommendation(pending).await.unwrap();
    assert!(matches!(
        &outcome,
        TurnOutcome::Discarded { session_id } if *session_id == first.session_id
    ));

    let stored_first = h.store.find_by_id(&first.session_id).await.unwrap().unwrap();
    assert_eq!(stored_first, first);
    let stored_second = h.store.find_by_id(&second.session_id).await.unwrap().unwrap();
    assert_eq!(stored_second, second);

    // The in-flight flag was released with the discarded turn.
    h.usecase.open_session(&first.session_id).await.unwrap();
    assert!(h.usecase.append_user_turn("again").await.is_ok());
}
