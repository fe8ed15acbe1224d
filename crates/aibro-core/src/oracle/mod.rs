//! Ranking oracle contract.
//!
//! The oracle is a hosted model that ranks a bounded candidate list against a
//! profile and can summarize a message into a short title. Implementations
//! live in `aibro-interaction`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::Announcement;
use crate::profile::UserProfile;

/// One ranked item returned by the oracle.
///
/// `id` should match the `policy_id` of one of the candidates; the oracle
/// returns a top-k selection, not an echo of every input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingRecord {
    pub id: String,
    /// Fit score, expected in `[0, 100]`
    pub score: f64,
    #[serde(default)]
    pub reason: String,
    /// 3-5 items expected, not enforced
    #[serde(default)]
    pub checklist: Vec<String>,
    #[serde(default)]
    pub risk_note: Option<String>,
}

/// Failures of an oracle call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OracleError {
    /// Transport or HTTP-level failure
    #[error("oracle request failed{}: {message}", status_suffix(.status_code))]
    Request {
        status_code: Option<u16>,
        message: String,
        retryable: bool,
    },

    /// The response was not valid JSON or violated the schema
    #[error("malformed oracle payload: {0}")]
    MalformedPayload(String),

    /// The response carried no usable text
    #[error("oracle returned an empty response")]
    EmptyResponse,

    /// The oracle is not configured (e.g. missing API key)
    #[error("oracle configuration error: {0}")]
    Config(String),
}

fn status_suffix(status_code: &Option<u16>) -> String {
    status_code.map(|c| format!(" ({c})")).unwrap_or_default()
}

impl OracleError {
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            status_code: None,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Request { retryable: true, .. })
    }
}

/// The external ranking and summarization capability.
#[async_trait]
pub trait RankingOracle: Send + Sync {
    /// Ranks `candidates` for `profile`, returning an ordered top-k list.
    async fn rank(
        &self,
        profile: &UserProfile,
        candidates: &[Announcement],
    ) -> Result<Vec<RankingRecord>, OracleError>;

    /// Produces a short title summarizing `text`.
    async fn summarize_title(&self, text: &str) -> Result<String, OracleError>;
}
