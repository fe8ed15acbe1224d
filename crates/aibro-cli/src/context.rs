//! Wiring of configuration, store, catalog and oracle for one CLI run.

use std::path::PathBuf;
use std::sync::Arc;

use aibro_application::{BrowseService, RecommendationOptions, RecommendationUseCase};
use aibro_core::catalog::{Announcement, Catalog};
use aibro_core::id::UuidIdProvider;
use aibro_core::oracle::{OracleError, RankingOracle, RankingRecord};
use aibro_core::profile::UserProfile;
use aibro_infrastructure::{AibroPaths, AppConfig, JsonFileStore, SecretConfig, load_catalog};
use aibro_interaction::GeminiRankingOracle;
use anyhow::{Context, Result};
use async_trait::async_trait;

pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<JsonFileStore>,
    pub catalog: Arc<Catalog>,
}

impl AppContext {
    pub fn load(config: AppConfig, data_dir: Option<PathBuf>) -> Result<Self> {
        let data_dir = match data_dir {
            Some(dir) => dir,
            None => AibroPaths::data_dir()?,
        };
        let store = JsonFileStore::new(&data_dir)
            .with_context(|| format!("Failed to open data directory {}", data_dir.display()))?;
        let catalog = load_catalog(config.catalog.path.as_deref()).context("Failed to load catalog")?;

        tracing::info!(
            data_dir = %data_dir.display(),
            catalog_items = catalog.len(),
            "CLI context ready"
        );
        Ok(Self {
            config,
            store: Arc::new(store),
            catalog: Arc::new(catalog),
        })
    }

    pub fn browse(&self) -> BrowseService {
        BrowseService::new(self.catalog.clone(), self.store.clone())
    }

    /// Builds the session orchestrator.
    ///
    /// Without Gemini credentials the orchestrator still works; every
    /// recommendation turn then ends with an apology.
    pub fn recommendations(&self) -> Result<RecommendationUseCase> {
        let secret = SecretConfig::load().context("Failed to load secret.json")?;
        let oracle: Arc<dyn RankingOracle> =
            match GeminiRankingOracle::from_config(&self.config, &secret) {
                Ok(oracle) => Arc::new(oracle),
                Err(e) => {
                    tracing::warn!("Ranking oracle unavailable: {}", e);
                    Arc::new(UnavailableOracle(e))
                }
            };

        Ok(RecommendationUseCase::new(
            self.catalog.clone(),
            self.store.clone(),
            oracle,
            Arc::new(UuidIdProvider),
        )
        .with_options(RecommendationOptions::from_config(&self.config)))
    }
}

/// Stand-in oracle that fails every call with the configuration error.
struct UnavailableOracle(OracleError);

#[async_trait]
impl RankingOracle for UnavailableOracle {
    async fn rank(
        &self,
        _profile: &UserProfile,
        _candidates: &[Announcement],
    ) -> Result<Vec<RankingRecord>, OracleError> {
        Err(self.0.clone())
    }

    async fn summarize_title(&self, _text: &str) -> Result<String, OracleError> {
        Err(self.0.clone())
    }
}
