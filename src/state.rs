use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::config::AppConfig;
use crate::food_facts::{FoodFactsClient, OpenFoodFacts};
use crate::meals::sessions::DraftSessions;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: Arc<AppConfig>,
    pub food_facts: Arc<dyn FoodFactsClient>,
    pub drafts: DraftSessions,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = PgPoolOptions::new()
            .max_connections(10)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;

        let food_facts =
            Arc::new(OpenFoodFacts::new(&config.food_facts_base_url)) as Arc<dyn FoodFactsClient>;

        Ok(Self {
            db,
            config,
            food_facts,
            drafts: DraftSessions::new(),
        })
    }

    pub fn from_parts(
        db: PgPool,
        config: Arc<AppConfig>,
        food_facts: Arc<dyn FoodFactsClient>,
    ) -> Self {
        Self {
            db,
            config,
            food_facts,
            drafts: DraftSessions::new(),
        }
    }
}
