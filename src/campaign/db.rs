use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use futures::TryStreamExt;
use sqlx::{FromRow, MySqlPool};

use crate::database::CampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignId, CampaignStatus, NewCampaign};

const CREATE_CAMPAIGNS: &str = r#"
CREATE TABLE IF NOT EXISTS campaigns (
    id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
    campaign_name VARCHAR(255) NOT NULL,
    client_name VARCHAR(255) NOT NULL,
    start_date DATE NOT NULL,
    status VARCHAR(16) NOT NULL DEFAULT 'active',
    created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
    updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP
)
"#;

pub async fn initialize(pool: &MySqlPool) -> Result<(), Error> {
    sqlx::query(CREATE_CAMPAIGNS).execute(pool).await?;

    Ok(())
}

#[derive(Debug, FromRow)]
struct CampaignRow {
    id: i64,
    campaign_name: String,
    client_name: String,
    start_date: NaiveDate,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CampaignRow {
    fn into_campaign(self) -> Result<Campaign, Error> {
        let status: CampaignStatus = self.status.parse().map_err(|_| {
            Error::ExistentialState(format!(
                "campaign {} has unknown status {:?}",
                self.id, self.status
            ))
        })?;

        Ok(Campaign {
            id: CampaignId::new(self.id),
            campaign_name: self.campaign_name,
            client_name: self.client_name,
            start_date: self.start_date,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub struct MySqlCampaignStore {
    pool: MySqlPool,
}

impl MySqlCampaignStore {
    pub fn new(pool: MySqlPool) -> MySqlCampaignStore {
        MySqlCampaignStore { pool }
    }
}

#[async_trait]
impl CampaignStore for MySqlCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &NewCampaign) -> Result<CampaignId, Error> {
        let result = sqlx::query(
            "INSERT INTO campaigns (campaign_name, client_name, start_date, status) VALUES (?, ?, ?, ?)",
        )
        .bind(&campaign.campaign_name)
        .bind(&campaign.client_name)
        .bind(campaign.start_date)
        .bind(campaign.status.as_str())
        .execute(&self.pool)
        .await?;

        let id = i64::try_from(result.last_insert_id()).map_err(|_| {
            Error::ExistentialState(format!(
                "insert id {} does not fit a campaign id",
                result.last_insert_id()
            ))
        })?;

        Ok(CampaignId::new(id))
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        let rows: Vec<CampaignRow> = sqlx::query_as::<_, CampaignRow>(
            "SELECT id, campaign_name, client_name, start_date, status, created_at, updated_at \
             FROM campaigns ORDER BY created_at DESC, id DESC",
        )
        .fetch(&self.pool)
        .try_collect()
        .await?;

        rows.into_iter().map(CampaignRow::into_campaign).collect()
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let row: Option<CampaignRow> = sqlx::query_as::<_, CampaignRow>(
            "SELECT id, campaign_name, client_name, start_date, status, created_at, updated_at \
             FROM campaigns WHERE id = ?",
        )
        .bind(campaign_id.get())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CampaignRow::into_campaign).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign_status(
        &self,
        campaign_id: CampaignId,
        status: CampaignStatus,
    ) -> Result<bool, Error> {
        let result = sqlx::query(
            "UPDATE campaigns SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
        )
        .bind(status.as_str())
        .bind(campaign_id.get())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() > 0 {
            return Ok(true);
        }

        // mysql does not count rows the update left unchanged
        Ok(self.fetch_campaign_by_id(campaign_id).await?.is_some())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = ?")
            .bind(campaign_id.get())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
