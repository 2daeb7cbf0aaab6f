use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod db;
pub mod endpoints;
pub mod manager;
pub use endpoints::*;

/// Row id assigned by storage on insert. Never reused after a delete.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct CampaignId(pub i64);

impl Display for CampaignId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        Display::fmt(&self.0, f)
    }
}

#[derive(Clone, Debug, PartialEq, sqlx::FromRow)]
pub struct Campaign {
    #[sqlx(rename = "campaign_id")]
    pub id: CampaignId,
    pub name: String,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// A campaign that has not been assigned an id yet.
#[derive(Clone, Debug)]
pub struct NewCampaign {
    pub name: String,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}
