//! Profile repository trait.

use async_trait::async_trait;

use super::model::UserProfile;
use crate::error::Result;

/// Durable record holding the single user profile.
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Returns the stored profile, or `None` if the user never saved one.
    async fn get_profile(&self) -> Result<Option<UserProfile>>;

    /// Replaces the stored profile.
    async fn save_profile(&self, profile: &UserProfile) -> Result<()>;
}
