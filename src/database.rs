use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::{error, info};

use crate::campaign::db::{self as campaign_db, MySqlCampaignStore};
use crate::campaign::fallback::FallbackCampaignStore;
use crate::campaign::memory::MemoryCampaignStore;
use crate::campaign::{Campaign, CampaignId, CampaignStatus, NewCampaign};
use crate::config::Config;
use crate::error::Error;

#[async_trait]
pub trait CampaignStore: Send + Sync {
    async fn insert_campaign(&self, campaign: &NewCampaign) -> Result<CampaignId, Error>;
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error>;
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;
    async fn update_campaign_status(
        &self,
        campaign_id: CampaignId,
        status: CampaignStatus,
    ) -> Result<bool, Error>;
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DatabaseHealth {
    Connected,
    InMemory,
    Unreachable,
}

#[async_trait]
pub trait Database: Send + Sync {
    fn campaigns(&self) -> &dyn CampaignStore;
    async fn health(&self) -> DatabaseHealth;
}

pub struct MySqlDatabase {
    pool: MySqlPool,
    campaigns: FallbackCampaignStore,
}

impl MySqlDatabase {
    /// Builds the pool without connecting; connections are made on first use.
    pub fn connect_lazy(config: &Config) -> Result<MySqlDatabase, Error> {
        let pool = config
            .pool_options()
            .connect_lazy_with(config.connect_options()?);
        let campaigns = FallbackCampaignStore::new(
            Box::new(MySqlCampaignStore::new(pool.clone())),
            config.fallback_enabled(),
        );

        Ok(MySqlDatabase { pool, campaigns })
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl Database for MySqlDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    async fn health(&self) -> DatabaseHealth {
        match ping(&self.pool).await {
            Ok(()) => DatabaseHealth::Connected,
            Err(err) if err.is_connection_refused() && self.campaigns.is_enabled() => {
                DatabaseHealth::InMemory
            }
            Err(_) => DatabaseHealth::Unreachable,
        }
    }
}

/// A database that never leaves the process. Used when running without MySQL
/// and in tests.
#[derive(Debug, Default)]
pub struct MemoryDatabase {
    campaigns: MemoryCampaignStore,
}

#[async_trait]
impl Database for MemoryDatabase {
    fn campaigns(&self) -> &dyn CampaignStore {
        &self.campaigns
    }

    async fn health(&self) -> DatabaseHealth {
        DatabaseHealth::InMemory
    }
}

#[tracing::instrument(skip(pool))]
pub async fn ping(pool: &MySqlPool) -> Result<(), Error> {
    sqlx::query("SELECT 1").execute(pool).await?;

    Ok(())
}

/// Checks connectivity and prepares the schema. Failures are only logged so
/// the server keeps serving from the fallback store.
pub async fn check_connection(pool: MySqlPool) {
    let result: Result<(), Error> = async {
        ping(&pool).await?;
        campaign_db::initialize(&pool).await
    }
    .await;

    match result {
        Ok(()) => info!("database connection successful"),
        Err(err) => {
            error!(error = %err, "database connection failed on startup");
            error!(
                "start a MySQL server or point DB_* at a running instance; \
                 outside production the API serves campaigns from memory until then"
            );
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    type Callback<A, R> = Box<dyn Fn(A) -> Result<R, Error> + Send + Sync>;

    pub struct MockCampaignStore {
        pub on_insert_campaign: Callback<NewCampaign, CampaignId>,
        pub on_fetch_campaigns: Callback<(), Vec<Campaign>>,
        pub on_fetch_campaign_by_id: Callback<CampaignId, Option<Campaign>>,
        pub on_update_campaign_status: Callback<(CampaignId, CampaignStatus), bool>,
        pub on_delete_campaign: Callback<CampaignId, bool>,
    }

    impl MockCampaignStore {
        pub fn new() -> MockCampaignStore {
            MockCampaignStore {
                on_insert_campaign: Box::new(|_| panic!("unexpected call to insert_campaign")),
                on_fetch_campaigns: Box::new(|_| panic!("unexpected call to fetch_campaigns")),
                on_fetch_campaign_by_id: Box::new(|_| {
                    panic!("unexpected call to fetch_campaign_by_id")
                }),
                on_update_campaign_status: Box::new(|_| {
                    panic!("unexpected call to update_campaign_status")
                }),
                on_delete_campaign: Box::new(|_| panic!("unexpected call to delete_campaign")),
            }
        }
    }

    #[async_trait]
    impl CampaignStore for MockCampaignStore {
        async fn insert_campaign(&self, campaign: &NewCampaign) -> Result<CampaignId, Error> {
            (self.on_insert_campaign)(campaign.clone())
        }

        async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
            (self.on_fetch_campaigns)(())
        }

        async fn fetch_campaign_by_id(
            &self,
            campaign_id: CampaignId,
        ) -> Result<Option<Campaign>, Error> {
            (self.on_fetch_campaign_by_id)(campaign_id)
        }

        async fn update_campaign_status(
            &self,
            campaign_id: CampaignId,
            status: CampaignStatus,
        ) -> Result<bool, Error> {
            (self.on_update_campaign_status)((campaign_id, status))
        }

        async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
            (self.on_delete_campaign)(campaign_id)
        }
    }

    pub struct MockDatabase {
        pub campaigns: MockCampaignStore,
    }

    impl MockDatabase {
        pub fn new() -> MockDatabase {
            MockDatabase {
                campaigns: MockCampaignStore::new(),
            }
        }
    }

    #[async_trait]
    impl Database for MockDatabase {
        fn campaigns(&self) -> &dyn CampaignStore {
            &self.campaigns
        }

        async fn health(&self) -> DatabaseHealth {
            DatabaseHealth::Connected
        }
    }
}
