use chrono::NaiveDate;

use crate::database::Database;
use crate::error::Error;

use super::{Campaign, CampaignId, CampaignStatus, CreateCampaignBody, NewCampaign};

/// Checks a create request: names and start date must be present and not
/// blank, and a given status must be one of the known values.
pub fn validate_new_campaign(body: CreateCampaignBody) -> Result<NewCampaign, Error> {
    let (campaign_name, client_name, start_date) = match (
        required(body.campaign_name),
        required(body.client_name),
        required(body.start_date),
    ) {
        (Some(campaign_name), Some(client_name), Some(start_date)) => {
            (campaign_name, client_name, start_date)
        }
        _ => return Err(Error::MissingCampaignFields),
    };

    let status = match body.status.as_deref() {
        None | Some("") => CampaignStatus::default(),
        Some(status) => status.parse().map_err(|_| Error::InvalidStatus {
            status: status.to_owned(),
        })?,
    };

    let start_date = NaiveDate::parse_from_str(&start_date, "%Y-%m-%d")
        .map_err(|_| Error::InvalidStartDate { start_date })?;

    Ok(NewCampaign {
        campaign_name,
        client_name,
        start_date,
        status,
    })
}

/// A status update must name one of the known values.
pub fn validate_status(status: Option<String>) -> Result<CampaignStatus, Error> {
    status
        .as_deref()
        .and_then(|status| status.parse().ok())
        .ok_or(Error::StatusRequired)
}

fn required(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

#[tracing::instrument(skip(db))]
pub async fn create_campaign(db: &dyn Database, campaign: NewCampaign) -> Result<Campaign, Error> {
    let campaign_id = db.campaigns().insert_campaign(&campaign).await?;

    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or_else(|| {
            Error::ExistentialState(format!("campaign {} vanished after insert", campaign_id))
        })?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaigns(db: &dyn Database) -> Result<Vec<Campaign>, Error> {
    let campaigns = db.campaigns().fetch_campaigns().await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: &dyn Database,
    campaign_id: CampaignId,
) -> Result<Option<Campaign>, Error> {
    let campaign = db.campaigns().fetch_campaign_by_id(campaign_id).await?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn update_campaign_status(
    db: &dyn Database,
    campaign_id: CampaignId,
    status: CampaignStatus,
) -> Result<Campaign, Error> {
    let updated = db
        .campaigns()
        .update_campaign_status(campaign_id, status)
        .await?;

    if !updated {
        return Err(Error::CampaignNotFound { campaign_id });
    }

    let campaign = db
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

#[tracing::instrument(skip(db))]
pub async fn delete_campaign(db: &dyn Database, campaign_id: CampaignId) -> Result<(), Error> {
    let deleted = db.campaigns().delete_campaign(campaign_id).await?;

    if !deleted {
        return Err(Error::CampaignNotFound { campaign_id });
    }

    Ok(())
}
