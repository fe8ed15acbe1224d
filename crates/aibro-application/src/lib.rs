//! Application layer for AI Bro.
//!
//! - `recommendation_usecase`: the chat session orchestrator
//! - `browse_service`: catalog views and saved announcements
//! - `session`: per-turn state (pending turns, outcomes, in-flight guard)
//! - `texts`: assistant message texts

pub mod browse_service;
pub mod recommendation_usecase;
pub mod session;
pub mod texts;

pub use browse_service::BrowseService;
pub use recommendation_usecase::{RecommendationOptions, RecommendationUseCase};
pub use session::{PendingTurn, TurnOutcome, TurnRejected};
