//! Interaction layer for AI Bro: the hosted ranking oracle.

pub mod gemini_oracle;
pub mod payload;
pub mod prompts;

pub use gemini_oracle::GeminiRankingOracle;
