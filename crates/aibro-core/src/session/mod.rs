//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Core session domain model (`ChatSession`)
//! - `message`: Conversation message types (`MessageRole`, `Message`)
//! - `repository`: Repository trait for session persistence

mod message;
mod model;
mod repository;

pub use message::{Message, MessageRole};
pub use model::{ChatSession, PLACEHOLDER_TITLE};
pub use repository::SessionRepository;
