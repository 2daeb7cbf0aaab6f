use actix_web::web::{Data, Json, Path};
use actix_web::{delete, get, post, put, HttpResponse};
use chrono::{DateTime, NaiveDateTime, ParseError, TimeZone, Utc};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::database::Database;
use crate::envelope::Envelope;
use crate::error::Error;

use super::{manager, Campaign, CampaignId};

/// Request body for both creating and replacing a campaign.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateCampaignBody {
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CampaignBody {
    pub campaign_id: CampaignId,
    pub name: String,
    pub due_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl CampaignBody {
    pub fn render(campaign: Campaign) -> CampaignBody {
        CampaignBody {
            campaign_id: campaign.id,
            name: campaign.name,
            due_date: campaign.due_date,
            created_at: campaign.created_at,
        }
    }
}

#[get("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn get_campaigns(
    db: Data<Box<dyn Database>>,
) -> Result<Json<Envelope<Vec<CampaignBody>>>, Error> {
    let mut session = db.open_session().await?;
    let campaigns = manager::get_campaigns(&mut *session).await?;

    let body = campaigns.into_iter().map(CampaignBody::render).collect();

    Ok(Json(Envelope::new(body)))
}

#[get("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn get_campaign_by_id(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<Json<Envelope<CampaignBody>>, Error> {
    let campaign_id = params.into_inner();

    let mut session = db.open_session().await?;
    let campaign = manager::get_campaign_by_id(&mut *session, campaign_id).await?;

    Ok(Json(Envelope::new(CampaignBody::render(campaign))))
}

#[post("/campaigns")]
#[tracing::instrument(skip(db))]
pub async fn create_campaign(
    db: Data<Box<dyn Database>>,
    body: Json<CreateCampaignBody>,
) -> Result<HttpResponse, Error> {
    let body = body.into_inner();

    let mut session = db.open_session().await?;
    let campaign = manager::create_campaign(&mut *session, body.name, body.due_date).await?;

    Ok(HttpResponse::Created().json(Envelope::new(CampaignBody::render(campaign))))
}

#[put("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn update_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
    body: Json<CreateCampaignBody>,
) -> Result<Json<Envelope<CampaignBody>>, Error> {
    let campaign_id = params.into_inner();
    let body = body.into_inner();

    let mut session = db.open_session().await?;
    let campaign =
        manager::update_campaign(&mut *session, campaign_id, body.name, body.due_date).await?;

    Ok(Json(Envelope::new(CampaignBody::render(campaign))))
}

#[delete("/campaigns/{campaign_id}")]
#[tracing::instrument(skip(db))]
pub async fn delete_campaign(
    db: Data<Box<dyn Database>>,
    params: Path<CampaignId>,
) -> Result<HttpResponse, Error> {
    let campaign_id = params.into_inner();

    let mut session = db.open_session().await?;
    manager::delete_campaign(&mut *session, campaign_id).await?;

    Ok(HttpResponse::NoContent().finish())
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;

    value
        .map(|value| parse_timestamp(&value).map_err(D::Error::custom))
        .transpose()
}

/// Accepts RFC 3339 timestamps, and timestamps without an offset which are
/// taken to be UTC.
fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, ParseError> {
    match DateTime::parse_from_rfc3339(value) {
        Ok(datetime) => Ok(datetime.with_timezone(&Utc)),
        Err(_) => value
            .parse::<NaiveDateTime>()
            .map(|naive| Utc.from_utc_datetime(&naive)),
    }
}
