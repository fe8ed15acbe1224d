//! Per-turn state of the recommendation session orchestrator.

mod in_flight;
mod turn;

pub use in_flight::{InFlightGuard, InFlightTurns};
pub use turn::{PendingTurn, TurnOutcome, TurnRejected};
