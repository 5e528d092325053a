//! services/campaign_service.rs
//! Persistance des campagnes marketing et résolution de leur audience.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Pool, Row, Sqlite};
use uuid::Uuid;

use crate::models::campaign_model::{
    Campaign, CreateCampaignRequest, UpdateCampaignRequest, STATUS_DRAFT, STATUS_SCHEDULED,
};
use crate::models::dispatch_model::{BulkReport, Recipient};
use crate::services::contact_service::ContactService;

#[derive(Clone)]
pub struct CampaignService {
    db_pool: Pool<Sqlite>,
    contact_service: ContactService,
}

impl CampaignService {
    pub fn new(db_pool: Pool<Sqlite>, contact_service: ContactService) -> Self {
        CampaignService {
            db_pool,
            contact_service,
        }
    }

    /// Applique les migrations sqlx (contacts + campagnes).
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.db_pool)
            .await
            .context("Migrations de la base campagnes en échec")?;
        Ok(())
    }

    pub async fn create_campaign(&self, req: CreateCampaignRequest) -> Result<Campaign> {
        let now = Utc::now().to_rfc3339();
        let status = if req.scheduled_at.is_some() {
            STATUS_SCHEDULED
        } else {
            STATUS_DRAFT
        };
        let campaign = Campaign {
            id: Uuid::new_v4().to_string(),
            name: req.name,
            message: req.message,
            media_url: req.media_url.filter(|u| !u.is_empty()),
            target_type: req.target_type,
            selected_contacts: req.selected_contacts,
            scheduled_at: req.scheduled_at,
            status: status.to_string(),
            sent_count: 0,
            failed_count: 0,
            results: serde_json::Value::Array(vec![]),
            created_at: now.clone(),
            updated_at: now,
        };

        let selected = serde_json::to_string(&campaign.selected_contacts)?;
        sqlx::query(
            r#"
            INSERT INTO campaigns (
                id, name, message, media_url, target_type, selected_contacts,
                scheduled_at, status, sent_count, failed_count, results,
                created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, 0, '[]', ?9, ?9)
            "#,
        )
        .bind(&campaign.id)
        .bind(&campaign.name)
        .bind(&campaign.message)
        .bind(&campaign.media_url)
        .bind(&campaign.target_type)
        .bind(&selected)
        .bind(&campaign.scheduled_at)
        .bind(&campaign.status)
        .bind(&campaign.created_at)
        .execute(&self.db_pool)
        .await
        .context("Insertion de la campagne en échec")?;

        Ok(campaign)
    }

    pub async fn list_campaigns(&self) -> Result<Vec<Campaign>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, message, media_url, target_type, selected_contacts,
                   scheduled_at, status, sent_count, failed_count, results,
                   created_at, updated_at
            FROM campaigns
            ORDER BY created_at DESC
            LIMIT 100
            "#,
        )
        .fetch_all(&self.db_pool)
        .await
        .context("Lecture des campagnes en échec")?;

        rows.into_iter().map(row_to_campaign).collect()
    }

    pub async fn get_campaign(&self, campaign_id: &str) -> Result<Option<Campaign>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, message, media_url, target_type, selected_contacts,
                   scheduled_at, status, sent_count, failed_count, results,
                   created_at, updated_at
            FROM campaigns
            WHERE id = ?1
            "#,
        )
        .bind(campaign_id)
        .fetch_optional(&self.db_pool)
        .await
        .context("Lecture de la campagne en échec")?;

        row.map(row_to_campaign).transpose()
    }

    /// Mise à jour partielle : seuls les champs fournis sont remplacés.
    pub async fn update_campaign(
        &self,
        campaign_id: &str,
        req: UpdateCampaignRequest,
    ) -> Result<Option<Campaign>> {
        let mut campaign = match self.get_campaign(campaign_id).await? {
            Some(c) => c,
            None => return Ok(None),
        };

        if let Some(name) = req.name {
            campaign.name = name;
        }
        if let Some(message) = req.message {
            campaign.message = message;
        }
        if let Some(media_url) = req.media_url {
            campaign.media_url = if media_url.is_empty() {
                None
            } else {
                Some(media_url)
            };
        }
        if let Some(target_type) = req.target_type {
            campaign.target_type = target_type;
        }
        if let Some(selected) = req.selected_contacts {
            campaign.selected_contacts = selected;
        }
        if let Some(scheduled_at) = req.scheduled_at {
            campaign.scheduled_at = Some(scheduled_at);
            campaign.status = STATUS_SCHEDULED.to_string();
        }
        if let Some(status) = req.status {
            campaign.status = status;
        }
        campaign.updated_at = Utc::now().to_rfc3339();

        let selected = serde_json::to_string(&campaign.selected_contacts)?;
        sqlx::query(
            r#"
            UPDATE campaigns
            SET name = ?2, message = ?3, media_url = ?4, target_type = ?5,
                selected_contacts = ?6, scheduled_at = ?7, status = ?8,
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(campaign_id)
        .bind(&campaign.name)
        .bind(&campaign.message)
        .bind(&campaign.media_url)
        .bind(&campaign.target_type)
        .bind(&selected)
        .bind(&campaign.scheduled_at)
        .bind(&campaign.status)
        .bind(&campaign.updated_at)
        .execute(&self.db_pool)
        .await
        .context("Mise à jour de la campagne en échec")?;

        Ok(Some(campaign))
    }

    pub async fn delete_campaign(&self, campaign_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM campaigns WHERE id = ?1")
            .bind(campaign_id)
            .execute(&self.db_pool)
            .await
            .context("Suppression de la campagne en échec")?;
        Ok(())
    }

    pub async fn mark_status(&self, campaign_id: &str, status: &str) -> Result<()> {
        sqlx::query("UPDATE campaigns SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(campaign_id)
            .bind(status)
            .bind(Utc::now().to_rfc3339())
            .execute(&self.db_pool)
            .await
            .context("Changement de statut de la campagne en échec")?;
        Ok(())
    }

    /// Enregistre le rapport d'un envoi en masse sur la campagne.
    pub async fn record_results(
        &self,
        campaign_id: &str,
        report: &BulkReport,
        status: &str,
    ) -> Result<()> {
        let results = serde_json::to_string(&report.details)?;
        sqlx::query(
            r#"
            UPDATE campaigns
            SET status = ?2, sent_count = ?3, failed_count = ?4,
                results = ?5, updated_at = ?6
            WHERE id = ?1
            "#,
        )
        .bind(campaign_id)
        .bind(status)
        .bind(report.sent as i64)
        .bind(report.failed as i64)
        .bind(&results)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.db_pool)
        .await
        .context("Enregistrement des résultats de campagne en échec")?;
        Ok(())
    }

    /// Audience de la campagne : tous les contacts, ou le sous-ensemble
    /// sélectionné (dans l'ordre de la table).
    pub async fn resolve_audience(&self, campaign: &Campaign) -> Result<Vec<Recipient>> {
        let contacts = self.contact_service.list_contacts().await?;
        let recipients = contacts
            .into_iter()
            .filter(|c| {
                campaign.target_type == "all" || campaign.selected_contacts.contains(&c.id)
            })
            .map(|c| Recipient {
                email: c.email,
                name: if c.name.is_empty() { None } else { Some(c.name) },
            })
            .collect();
        Ok(recipients)
    }

    /// Campagnes programmées dont l'échéance est passée.
    pub async fn due_campaigns(&self, now: DateTime<Utc>) -> Result<Vec<Campaign>> {
        let scheduled = sqlx::query(
            r#"
            SELECT id, name, message, media_url, target_type, selected_contacts,
                   scheduled_at, status, sent_count, failed_count, results,
                   created_at, updated_at
            FROM campaigns
            WHERE status = ?1 AND scheduled_at IS NOT NULL
            "#,
        )
        .bind(STATUS_SCHEDULED)
        .fetch_all(&self.db_pool)
        .await
        .context("Lecture des campagnes programmées en échec")?;

        let mut due = vec![];
        for row in scheduled {
            let campaign = row_to_campaign(row)?;
            let date_str = match campaign.scheduled_at.as_deref() {
                Some(s) => s,
                None => continue,
            };
            match parse_scheduled_date(date_str) {
                Some(when) if when <= now => due.push(campaign),
                Some(_) => {}
                None => {
                    log::warn!(
                        "(due_campaigns) Date programmée illisible '{}' (campagne {})",
                        date_str,
                        campaign.id
                    );
                }
            }
        }
        Ok(due)
    }
}

fn row_to_campaign(row: SqliteRow) -> Result<Campaign> {
    let selected: String = row.get("selected_contacts");
    let results: String = row.get("results");
    Ok(Campaign {
        id: row.get("id"),
        name: row.get("name"),
        message: row.get("message"),
        media_url: row.get("media_url"),
        target_type: row.get("target_type"),
        selected_contacts: serde_json::from_str(&selected).unwrap_or_default(),
        scheduled_at: row.get("scheduled_at"),
        status: row.get("status"),
        sent_count: row.get("sent_count"),
        failed_count: row.get("failed_count"),
        results: serde_json::from_str(&results).unwrap_or(serde_json::Value::Array(vec![])),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// Parse une date programmée ISO-8601. Les dates sans fuseau sont
/// traitées comme UTC (comportement historique du scheduler).
pub fn parse_scheduled_date(date_str: &str) -> Option<DateTime<Utc>> {
    if date_str.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(date_str, "%Y-%m-%dT%H:%M"))
        .ok()?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc))
}
