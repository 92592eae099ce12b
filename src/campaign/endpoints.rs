use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::database::Database;
use crate::error::Error;
use crate::utils::Envelope;

use super::{manager, Campaign, CampaignId, CampaignStatus};

/// Fields stay optional so missing values are reported with a validation
/// message rather than a json parse error.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct CreateCampaignBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl CreateCampaignBody {
    pub fn new(campaign_name: &str, client_name: &str, start_date: &str) -> CreateCampaignBody {
        CreateCampaignBody {
            campaign_name: Some(campaign_name.into()),
            client_name: Some(client_name.into()),
            start_date: Some(start_date.into()),
            status: None,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UpdateCampaignStatusBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampaignBody {
    pub id: CampaignId,
    pub campaign_name: String,
    pub client_name: String,
    pub start_date: NaiveDate,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            id: campaign.id,
            campaign_name: campaign.campaign_name,
            client_name: campaign.client_name,
            start_date: campaign.start_date,
            status: campaign.status,
            created_at: campaign.created_at,
            updated_at: campaign.updated_at,
        }
    }
}

#[get("/api/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: Data<Box<dyn Database>>,
) -> Result<Json<Envelope<Vec<CampaignBody>>>, Error> {
    let campaigns = manager::get_campaigns(&***db).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(Envelope::success(
        body,
        "Campaigns retrieved successfully",
    )))
}

#[post("/api/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<CreateCampaignBody>,
) -> Result<HttpResponse, Error> {
    let campaign = manager::validate_new_campaign(body.into_inner())?;

    let campaign = manager::create_campaign(&***db, campaign).await?;

    Ok(HttpResponse::Created().json(Envelope::success(
        CampaignBody::render(campaign),
        "Campaign created successfully",
    )))
}

#[get("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<Envelope<CampaignBody>>, Error> {
    let campaign_id = params.into_inner();

    let campaign = manager::get_campaign_by_id(&***db, campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(Json(Envelope::success(
        CampaignBody::render(campaign),
        "Campaign retrieved successfully",
    )))
}

#[put("/api/campaigns/{campaign_id}/status")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign_status(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
    body: Json<UpdateCampaignStatusBody>,
) -> Result<Json<Envelope<CampaignBody>>, Error> {
    let campaign_id = params.into_inner();
    let status = manager::validate_status(body.into_inner().status)?;

    let campaign = manager::update_campaign_status(&***db, campaign_id, status).await?;

    Ok(Json(Envelope::success(
        CampaignBody::render(campaign),
        "Campaign status updated successfully",
    )))
}

#[delete("/api/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<Envelope<()>>, Error> {
    let campaign_id = params.into_inner();

    manager::delete_campaign(&***db, campaign_id).await?;

    Ok(Json(Envelope::success_without_data(
        "Campaign deleted successfully",
    )))
}
