use chrono::Utc;
use tracing::info;

use crate::campaign::NewCampaign;
use crate::database::Session;
use crate::error::Error;

const SEED_CAMPAIGN_NAMES: [&str; 2] = ["Summer Launch", "Black Friday"];

/// Inserts the bootstrap campaigns, but only into an empty table.
#[tracing::instrument(skip(session))]
pub async fn seed_if_empty(session: &mut dyn Session) -> Result<(), Error> {
    if session.campaigns().count_campaigns().await? > 0 {
        return Ok(());
    }

    let now = Utc::now();
    let campaigns: Vec<NewCampaign> = SEED_CAMPAIGN_NAMES
        .iter()
        .map(|name| NewCampaign {
            name: name.to_string(),
            due_date: Some(now),
            created_at: now,
        })
        .collect();

    let campaign_ids = session.campaigns().insert_campaigns(&campaigns).await?;
    info!("seeded {} campaigns", campaign_ids.len());

    Ok(())
}
