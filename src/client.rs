//! A typed client for the campaign api, plus the search filter the campaign
//! list applies on top of it.

use std::fmt::{Debug, Display};

use actix_web::http::StatusCode;
use awc::error::{JsonPayloadError, SendRequestError};
use awc::Client;

use crate::campaign::{CampaignBody, CampaignId, CreateCampaignBody, UpdateCampaignStatusBody};
use crate::health::HealthBody;
use crate::utils::Envelope;

#[derive(Debug)]
pub enum ClientError {
    /// The request never produced a readable response.
    Network(String),
    /// The server answered with a failure envelope.
    Api {
        status: u16,
        message: String,
        error: Option<String>,
    },
    /// A success envelope came back without the expected `data`.
    MissingData,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            ClientError::Network(msg) => write!(f, "network error: {}", msg),
            ClientError::Api {
                status, message, ..
            } => write!(f, "{} ({})", message, status),
            ClientError::MissingData => Debug::fmt(self, f),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<SendRequestError> for ClientError {
    fn from(error: SendRequestError) -> ClientError {
        ClientError::Network(error.to_string())
    }
}

impl From<JsonPayloadError> for ClientError {
    fn from(error: JsonPayloadError) -> ClientError {
        ClientError::Network(error.to_string())
    }
}

pub struct CampaignClient {
    base_url: String,
    http: Client,
}

impl CampaignClient {
    pub fn new(base_url: impl Into<String>) -> CampaignClient {
        let base_url = base_url.into().trim_end_matches('/').to_owned();
        CampaignClient {
            base_url,
            http: Client::default(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get_campaigns(&self) -> Result<Vec<CampaignBody>, ClientError> {
        let mut response = self.http.get(self.url("/api/campaigns")).send().await?;
        let envelope = response.json().await?;

        into_data(response.status(), envelope)
    }

    pub async fn get_campaign(&self, campaign_id: CampaignId) -> Result<CampaignBody, ClientError> {
        let url = self.url(&format!("/api/campaigns/{}", campaign_id));
        let mut response = self.http.get(url).send().await?;
        let envelope = response.json().await?;

        into_data(response.status(), envelope)
    }

    pub async fn create_campaign(
        &self,
        body: &CreateCampaignBody,
    ) -> Result<CampaignBody, ClientError> {
        let mut response = self
            .http
            .post(self.url("/api/campaigns"))
            .send_json(body)
            .await?;
        let envelope = response.json().await?;

        into_data(response.status(), envelope)
    }

    pub async fn update_campaign_status(
        &self,
        campaign_id: CampaignId,
        status: &str,
    ) -> Result<CampaignBody, ClientError> {
        let url = self.url(&format!("/api/campaigns/{}/status", campaign_id));
        let body = UpdateCampaignStatusBody {
            status: Some(status.to_owned()),
        };
        let mut response = self.http.put(url).send_json(&body).await?;
        let envelope = response.json().await?;

        into_data(response.status(), envelope)
    }

    pub async fn delete_campaign(&self, campaign_id: CampaignId) -> Result<(), ClientError> {
        let url = self.url(&format!("/api/campaigns/{}", campaign_id));
        let mut response = self.http.delete(url).send().await?;
        let envelope: Envelope<()> = response.json().await?;

        check(response.status(), envelope).map(|_| ())
    }

    pub async fn health(&self) -> Result<HealthBody, ClientError> {
        let mut response = self.http.get(self.url("/health")).send().await?;
        let envelope = response.json().await?;

        into_data(response.status(), envelope)
    }
}

fn check<T>(status: StatusCode, envelope: Envelope<T>) -> Result<Envelope<T>, ClientError> {
    if envelope.success && status.is_success() {
        Ok(envelope)
    } else {
        Err(ClientError::Api {
            status: status.as_u16(),
            message: envelope.message,
            error: envelope.error,
        })
    }
}

fn into_data<T>(status: StatusCode, envelope: Envelope<T>) -> Result<T, ClientError> {
    check(status, envelope)?.data.ok_or(ClientError::MissingData)
}

/// Keeps the campaigns whose name or client contains `query`, ignoring case.
/// A blank query keeps everything.
pub fn filter_campaigns<'a>(campaigns: &'a [CampaignBody], query: &str) -> Vec<&'a CampaignBody> {
    let query = query.trim().to_lowercase();

    campaigns
        .iter()
        .filter(|campaign| {
            query.is_empty()
                || campaign.campaign_name.to_lowercase().contains(&query)
                || campaign.client_name.to_lowercase().contains(&query)
        })
        .collect()
}
