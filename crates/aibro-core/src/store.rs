//! The durable store contract.
//!
//! Four independent records, each read and written as a whole:
//!
//! | Record | Trait | Default when absent |
//! |---|---|---|
//! | profile | [`ProfileRepository`] | `None` |
//! | saved policy IDs | [`SavedPolicyRepository`] | empty |
//! | chat sessions | [`SessionRepository`] | empty |
//! | settings | [`SettingsRepository`] | `reuse_profile = true` |

pub use crate::profile::ProfileRepository;
pub use crate::saved::SavedPolicyRepository;
pub use crate::session::SessionRepository;
pub use crate::settings::SettingsRepository;

/// A backend implementing all four records.
pub trait DurableStore:
    ProfileRepository + SavedPolicyRepository + SessionRepository + SettingsRepository
{
}

impl<T> DurableStore for T where
    T: ProfileRepository + SavedPolicyRepository + SessionRepository + SettingsRepository
{
}
