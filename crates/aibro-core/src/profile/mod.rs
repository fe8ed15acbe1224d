//! User profile domain module.

mod model;
mod repository;

pub use model::{PLACEHOLDER_OPENING_DATE, UserProfile};
pub use repository::ProfileRepository;
