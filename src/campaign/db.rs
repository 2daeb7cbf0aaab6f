use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use sqlx::{Connection, SqliteConnection};

use crate::database::SqliteSession;
use crate::error::Error;

use super::{Campaign, CampaignId, NewCampaign};

const CREATE_CAMPAIGN_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS campaign (
        campaign_id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        due_date TEXT,
        created_at TEXT NOT NULL
    )
"#;

const CREATE_CAMPAIGN_INDEXES: [&str; 3] = [
    "CREATE INDEX IF NOT EXISTS ix_campaign_name ON campaign (name)",
    "CREATE INDEX IF NOT EXISTS ix_campaign_due_date ON campaign (due_date)",
    "CREATE INDEX IF NOT EXISTS ix_campaign_created_at ON campaign (created_at)",
];

const SELECT_CAMPAIGNS: &str =
    "SELECT campaign_id, name, due_date, created_at FROM campaign ORDER BY campaign_id";

const SELECT_CAMPAIGN_BY_ID: &str =
    "SELECT campaign_id, name, due_date, created_at FROM campaign WHERE campaign_id = ?";

/// Creates the campaign table and its indexes if they are absent. Existing
/// tables are left untouched whatever their shape.
#[tracing::instrument(skip(conn))]
pub async fn initialize(conn: &mut SqliteConnection) -> Result<(), Error> {
    let mut tx = conn.begin().await?;

    sqlx::query(CREATE_CAMPAIGN_TABLE).execute(&mut *tx).await?;
    for statement in CREATE_CAMPAIGN_INDEXES.iter() {
        sqlx::query(*statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;

    Ok(())
}

#[async_trait]
pub trait CampaignStore: Send {
    async fn count_campaigns(&mut self) -> Result<i64, Error>;

    async fn fetch_campaigns(&mut self) -> Result<Vec<Campaign>, Error>;

    async fn fetch_campaign_by_id(
        &mut self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error>;

    /// Inserts and commits a single campaign, returning its generated id.
    async fn insert_campaign(&mut self, campaign: &NewCampaign) -> Result<CampaignId, Error>;

    /// Inserts all campaigns in one transaction.
    async fn insert_campaigns(
        &mut self,
        campaigns: &[NewCampaign],
    ) -> Result<Vec<CampaignId>, Error>;

    /// Overwrites both mutable fields. Fails with `CampaignNotFound` without
    /// writing anything if the row is absent.
    async fn update_campaign(
        &mut self,
        campaign_id: CampaignId,
        name: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<(), Error>;

    async fn delete_campaign(&mut self, campaign_id: CampaignId) -> Result<(), Error>;
}

#[async_trait]
impl CampaignStore for SqliteSession {
    #[tracing::instrument(skip(self))]
    async fn count_campaigns(&mut self) -> Result<i64, Error> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM campaign")
            .fetch_one(self.connection())
            .await?;

        Ok(count)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaigns(&mut self) -> Result<Vec<Campaign>, Error> {
        let campaigns: Vec<Campaign> = sqlx::query_as::<_, Campaign>(SELECT_CAMPAIGNS)
            .fetch(self.connection())
            .try_collect()
            .await?;

        Ok(campaigns)
    }

    #[tracing::instrument(skip(self))]
    async fn fetch_campaign_by_id(
        &mut self,
        campaign_id: CampaignId,
    ) -> Result<Option<Campaign>, Error> {
        let campaign: Option<Campaign> = sqlx::query_as(SELECT_CAMPAIGN_BY_ID)
            .bind(campaign_id)
            .fetch_optional(self.connection())
            .await?;

        Ok(campaign)
    }

    #[tracing::instrument(skip(self))]
    async fn insert_campaign(&mut self, campaign: &NewCampaign) -> Result<CampaignId, Error> {
        let mut tx = self.connection().begin().await?;
        let campaign_id = insert_row(&mut *tx, campaign).await?;
        tx.commit().await?;

        Ok(campaign_id)
    }

    #[tracing::instrument(skip(self))]
    async fn insert_campaigns(
        &mut self,
        campaigns: &[NewCampaign],
    ) -> Result<Vec<CampaignId>, Error> {
        let mut tx = self.connection().begin().await?;
        let mut campaign_ids = Vec::with_capacity(campaigns.len());
        for campaign in campaigns {
            campaign_ids.push(insert_row(&mut *tx, campaign).await?);
        }
        tx.commit().await?;

        Ok(campaign_ids)
    }

    #[tracing::instrument(skip(self))]
    async fn update_campaign(
        &mut self,
        campaign_id: CampaignId,
        name: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> Result<(), Error> {
        let mut tx = self.connection().begin().await?;

        let result =
            sqlx::query("UPDATE campaign SET name = ?, due_date = ? WHERE campaign_id = ?")
                .bind(name)
                .bind(due_date)
                .bind(campaign_id)
                .execute(&mut *tx)
                .await?;

        if result.rows_affected() == 0 {
            return Err(Error::CampaignNotFound { campaign_id });
        }

        tx.commit().await?;

        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn delete_campaign(&mut self, campaign_id: CampaignId) -> Result<(), Error> {
        let mut tx = self.connection().begin().await?;

        let result = sqlx::query("DELETE FROM campaign WHERE campaign_id = ?")
            .bind(campaign_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::CampaignNotFound { campaign_id });
        }

        tx.commit().await?;

        Ok(())
    }
}

async fn insert_row(
    conn: &mut SqliteConnection,
    campaign: &NewCampaign,
) -> Result<CampaignId, Error> {
    let result =
        sqlx::query("INSERT INTO campaign (name, due_date, created_at) VALUES (?, ?, ?)")
            .bind(campaign.name.as_str())
            .bind(campaign.due_date)
            .bind(campaign.created_at)
            .execute(conn)
            .await?;

    Ok(CampaignId(result.last_insert_rowid()))
}
