use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use crate::database::CampaignStore;
use crate::error::Error;

use super::{Campaign, CampaignId, CampaignStatus, NewCampaign};

/// Keeps campaigns in a list, newest first, shaped exactly like the rows the
/// sql store returns. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryCampaignStore {
    state: Mutex<MemoryState>,
}

#[derive(Debug)]
struct MemoryState {
    campaigns: Vec<Campaign>,
    next_id: i64,
}

impl Default for MemoryCampaignStore {
    fn default() -> MemoryCampaignStore {
        MemoryCampaignStore {
            state: Mutex::new(MemoryState {
                campaigns: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

#[async_trait]
impl CampaignStore for MemoryCampaignStore {
    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&self, campaign: &NewCampaign) -> Result<CampaignId, Error> {
        let mut state = self.state.lock();
        let id = CampaignId::new(state.next_id);
        state.next_id += 1;

        let now = Utc::now();
        state.campaigns.insert(
            0,
            Campaign {
                id,
                campaign_name: campaign.campaign_name.clone(),
                client_name: campaign.client_name.clone(),
                start_date: campaign.start_date,
                status: campaign.status,
                created_at: now,
                updated_at: now,
            },
        );

        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&self) -> Result<Vec<Campaign>, Error> {
        Ok(self.state.lock().campaigns.clone())
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let state = self.state.lock();
        let campaign = state
            .campaigns
            .iter()
            .find(|campaign| campaign.id == campaign_id)
            .cloned();

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign_status(
        &self,
        campaign_id: CampaignId,
        status: CampaignStatus,
    ) -> Result<bool, Error> {
        let mut state = self.state.lock();
        match state
            .campaigns
            .iter_mut()
            .find(|campaign| campaign.id == campaign_id)
        {
            Some(campaign) => {
                campaign.status = status;
                campaign.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<bool, Error> {
        let mut state = self.state.lock();
        let before = state.campaigns.len();
        state.campaigns.retain(|campaign| campaign.id != campaign_id);

        Ok(state.campaigns.len() != before)
    }
}
