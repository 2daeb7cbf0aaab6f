use chrono::{DateTime, Utc};

use crate::database::Session;
use crate::error::Error;

use super::{Campaign, CampaignId, NewCampaign};

#[tracing::instrument(skip(session))]
pub async fn get_campaigns(session: &mut dyn Session) -> Result<Vec<Campaign>, Error> {
    let campaigns = session.campaigns().fetch_campaigns().await?;

    Ok(campaigns)
}

#[tracing::instrument(skip(session))]
pub async fn get_campaign_by_id(
    session: &mut dyn Session,
    campaign_id: CampaignId,
) -> Result<Campaign, Error> {
    let campaign = session
        .campaigns()
        .fetch_campaign_by_id(campaign_id)
        .await?
        .ok_or(Error::CampaignNotFound { campaign_id })?;

    Ok(campaign)
}

#[tracing::instrument(skip(session))]
pub async fn create_campaign(
    session: &mut dyn Session,
    name: String,
    due_date: Option<DateTime<Utc>>,
) -> Result<Campaign, Error> {
    let campaign = NewCampaign {
        name,
        due_date,
        created_at: Utc::now(),
    };

    let campaign_id = session.campaigns().insert_campaign(&campaign).await?;

    get_campaign_by_id(session, campaign_id).await
}

/// Replaces `name` and `due_date` wholesale; a `None` due date clears it.
#[tracing::instrument(skip(session))]
pub async fn update_campaign(
    session: &mut dyn Session,
    campaign_id: CampaignId,
    name: String,
    due_date: Option<DateTime<Utc>>,
) -> Result<Campaign, Error> {
    session
        .campaigns()
        .update_campaign(campaign_id, &name, due_date)
        .await?;

    get_campaign_by_id(session, campaign_id).await
}

#[tracing::instrument(skip(session))]
pub async fn delete_campaign(
    session: &mut dyn Session,
    campaign_id: CampaignId,
) -> Result<(), Error> {
    session.campaigns().delete_campaign(campaign_id).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test::MockSession;
    use std::sync::{Arc, Mutex};

    fn stored_campaign(campaign_id: CampaignId, name: &str) -> Campaign {
        Campaign {
            id: campaign_id,
            name: name.to_string(),
            due_date: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn can_create_campaign() {
        let mut session = MockSession::new();
        let inserted = Arc::new(Mutex::new(None));
        let inserted_clone = Arc::clone(&inserted);
        session.campaigns.on_insert_campaign = Box::new(move |campaign| {
            assert_eq!(campaign.name, "Q4 Push".to_string());
            assert_eq!(campaign.due_date, None);
            *inserted_clone.lock().unwrap() = Some(campaign);
            Ok(CampaignId(3))
        });
        let reloaded = Arc::clone(&inserted);
        session.campaigns.on_fetch_campaign_by_id = Box::new(move |campaign_id| {
            let campaign = reloaded.lock().unwrap().clone().unwrap();
            Ok(Some(Campaign {
                id: campaign_id,
                name: campaign.name,
                due_date: campaign.due_date,
                created_at: campaign.created_at,
            }))
        });

        let before = Utc::now();
        let campaign = create_campaign(&mut session, "Q4 Push".into(), None)
            .await
            .unwrap();
        let after = Utc::now();

        assert_eq!(campaign.id, CampaignId(3));
        assert_eq!(campaign.name, "Q4 Push".to_string());
        assert!(before <= campaign.created_at && campaign.created_at <= after);
    }

    #[tokio::test]
    async fn get_campaign_by_id_returns_campaign() {
        let mut session = MockSession::new();
        let called_get_by_id = Arc::new(Mutex::new(false));
        let called_get_by_id_clone = Arc::clone(&called_get_by_id);
        session.campaigns.on_fetch_campaign_by_id = Box::new(move |campaign_id| {
            *called_get_by_id_clone.lock().unwrap() = true;
            assert_eq!(campaign_id, CampaignId(1));
            Ok(Some(stored_campaign(campaign_id, "Summer Launch")))
        });

        let campaign = get_campaign_by_id(&mut session, CampaignId(1)).await.unwrap();

        assert_eq!(campaign.name, "Summer Launch".to_string());
        assert!(
            *called_get_by_id.lock().unwrap(),
            "session.fetch_campaign_by_id was not called"
        );
    }

    #[tokio::test]
    async fn get_campaign_by_id_returns_error_if_doesnt_exist() {
        let mut session = MockSession::new();
        session.campaigns.on_fetch_campaign_by_id = Box::new(|_| Ok(None));

        let campaign_result = get_campaign_by_id(&mut session, CampaignId(42)).await;

        assert_eq!(
            campaign_result.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: CampaignId(42)
            }
        );
    }

    #[tokio::test]
    async fn update_passes_missing_due_date_through_as_none() {
        let mut session = MockSession::new();
        let called_update = Arc::new(Mutex::new(false));
        let called_update_clone = Arc::clone(&called_update);
        session.campaigns.on_update_campaign = Box::new(move |(campaign_id, name, due_date)| {
            *called_update_clone.lock().unwrap() = true;
            assert_eq!(campaign_id, CampaignId(1));
            assert_eq!(name, "Renamed".to_string());
            assert_eq!(due_date, None);
            Ok(())
        });
        session.campaigns.on_fetch_campaign_by_id =
            Box::new(|campaign_id| Ok(Some(stored_campaign(campaign_id, "Renamed"))));

        let campaign = update_campaign(&mut session, CampaignId(1), "Renamed".into(), None)
            .await
            .unwrap();

        assert_eq!(campaign.name, "Renamed".to_string());
        assert_eq!(campaign.due_date, None);
        assert!(
            *called_update.lock().unwrap(),
            "session.update_campaign was not called"
        );
    }

    #[tokio::test]
    async fn update_of_missing_campaign_does_not_reload() {
        let mut session = MockSession::new();
        session.campaigns.on_update_campaign = Box::new(|(campaign_id, _, _)| {
            Err(Error::CampaignNotFound { campaign_id })
        });

        // fetch_campaign_by_id panics if called
        let result = update_campaign(&mut session, CampaignId(9), "Nope".into(), None).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: CampaignId(9)
            }
        );
    }

    #[tokio::test]
    async fn delete_propagates_not_found() {
        let mut session = MockSession::new();
        session.campaigns.on_delete_campaign =
            Box::new(|campaign_id| Err(Error::CampaignNotFound { campaign_id }));

        let result = delete_campaign(&mut session, CampaignId(999)).await;

        assert_eq!(
            result.unwrap_err(),
            Error::CampaignNotFound {
                campaign_id: CampaignId(999)
            }
        );
    }

    #[tokio::test]
    async fn get_campaigns_returns_everything_stored() {
        let mut session = MockSession::new();
        session.campaigns.on_fetch_campaigns = Box::new(|_| {
            Ok(vec![
                stored_campaign(CampaignId(1), "Summer Launch"),
                stored_campaign(CampaignId(2), "Black Friday"),
            ])
        });

        let campaigns = get_campaigns(&mut session).await.unwrap();

        assert_eq!(campaigns.len(), 2);
        assert_eq!(campaigns[1].name, "Black Friday".to_string());
    }
}
