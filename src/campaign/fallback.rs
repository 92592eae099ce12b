use async_trait::async_trait;
use tracing::warn;

use crate::database::CampaignStore;
use crate::error::Error;

use super::memory::MemoryCampaignStore;
use super::{Campaign, CampaignId, CampaignStatus, NewCampaign};

/// Sends every call to the primary store first. When the primary cannot be
/// reached and fallback is enabled, the call is served from memory instead.
/// Every other error is passed through.
pub struct FallbackCampaignStore {
    primary: Box<dyn CampaignStore>,
    fallback: MemoryCampaignStore,
    enabled: bool,
}

impl FallbackCampaignStore {
    pub fn new(primary: Box<dyn CampaignStore>, enabled: bool) -> FallbackCampaignStore {
        FallbackCampaignStore {
            primary,
            fallback: MemoryCampaignStore::default(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn should_fall_back(&self, err: &Error) -> bool {
        if self.enabled && err.is_connection_refused() {
            warn!(error = %err, "database unreachable, using in-memory campaign store");
            true
        } else {
            false
        }
    }
}

#[async_trait]
impl CampaignStore for FallbackCampaignStore {
    async fn insert_campaign(&self, campaign: &NewCampaign) -> Result<CampaignId, Error> {
        match self.primary.insert_campaign(campaign).await {
            Err(err) if self.should_fall_back(&err) => {
                self.fallback.insert_campaign(campaign).await
            }
            result => result,
        }
    }

    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        match self.primary.fetch_campaigns().await {
            Err(err) if self.should_fall_back(&err) => self.fallback.fetch_campaigns().await,
            result => result,
        }
    }

    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        match self.primary.fetch_campaign_by_id(campaign_id).await {
            Err(err) if self.should_fall_back(&err) => {
                self.fallback.fetch_campaign_by_id(campaign_id).await
            }
            result => result,
        }
    }

    async fn update_campaign_status(
        &self,
        campaign_id: CampaignId,
        status: CampaignStatus,
    ) -> Result<bool, Error> {
        match self.primary.update_campaign_status(campaign_id, status).await {
            Err(err) if self.should_fall_back(&err) => {
                self.fallback
                    .update_campaign_status(campaign_id, status)
                    .await
            }
            result => result,
        }
    }

    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        match self.primary.delete_campaign(campaign_id).await {
            Err(err) if self.should_fall_back(&err) => {
                self.fallback.delete_campaign(campaign_id).await
            }
            result => result,
        }
    }
}
