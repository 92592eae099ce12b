use std::fmt::{self, Display};
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::typedid::{TypedId, TypedIdMarker};

pub mod db;
pub mod endpoints;
pub mod fallback;
pub mod manager;
pub mod memory;
pub use endpoints::*;

pub type CampaignId = TypedId<Campaign>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Campaign {
    pub id: CampaignId,
    pub campaign_name: String,
    pub client_name: String,
    pub start_date: NaiveDate,
    pub status: CampaignStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TypedIdMarker for Campaign {
    fn tag() -> &'static str {
        "CPN"
    }
}

/// A validated campaign that has not been given an id yet.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewCampaign {
    pub campaign_name: String,
    pub client_name: String,
    pub start_date: NaiveDate,
    pub status: CampaignStatus,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Active,
    Paused,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Completed => "completed",
        }
    }
}

impl Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CampaignStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(CampaignStatus::Active),
            "paused" => Ok(CampaignStatus::Paused),
            "completed" => Ok(CampaignStatus::Completed),
            _ => Err(UnknownStatus),
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnknownStatus;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_only_known_lowercase_values() {
        assert_eq!("active".parse(), Ok(CampaignStatus::Active));
        assert_eq!("paused".parse(), Ok(CampaignStatus::Paused));
        assert_eq!("completed".parse(), Ok(CampaignStatus::Completed));
        assert_eq!("Active".parse::<CampaignStatus>(), Err(UnknownStatus));
        assert_eq!("archived".parse::<CampaignStatus>(), Err(UnknownStatus));
        assert_eq!("".parse::<CampaignStatus>(), Err(UnknownStatus));
    }

    #[test]
    fn status_defaults_to_active() {
        assert_eq!(CampaignStatus::default(), CampaignStatus::Active);
    }
}
