//! services/scheduler_service.rs
//! Orchestration des envois de campagne : lancement immédiat (HTTP) et
//! boucle de fond pour les campagnes programmées.

use anyhow::{anyhow, Result};
use chrono::Utc;

use crate::models::campaign_model::{STATUS_COMPLETED, STATUS_SENDING};
use crate::models::dispatch_model::{BulkReport, ProgressFn, ProgressStatus, SendProgress};
use crate::services::campaign_service::CampaignService;
use crate::services::dispatch_service::DispatchService;

#[derive(Clone)]
pub struct SchedulerService {
    campaign_service: CampaignService,
    dispatch_service: DispatchService,
}

impl SchedulerService {
    pub fn new(campaign_service: CampaignService, dispatch_service: DispatchService) -> Self {
        SchedulerService {
            campaign_service,
            dispatch_service,
        }
    }

    /// Délivre une campagne maintenant : résout l'audience, envoie en
    /// masse, enregistre le rapport et passe la campagne en `completed`.
    pub async fn deliver_campaign(&self, campaign_id: &str) -> Result<BulkReport> {
        let campaign = self
            .campaign_service
            .get_campaign(campaign_id)
            .await?
            .ok_or_else(|| anyhow!("Campagne introuvable: {}", campaign_id))?;

        let recipients = self.campaign_service.resolve_audience(&campaign).await?;
        log::info!(
            "(deliver_campaign) Campagne '{}': {} destinataire(s)",
            campaign.name,
            recipients.len()
        );

        if recipients.is_empty() {
            // Aucun contact ciblé : campagne terminée sans envoi.
            self.campaign_service
                .mark_status(campaign_id, STATUS_COMPLETED)
                .await?;
            return Ok(BulkReport::default());
        }

        self.campaign_service
            .mark_status(campaign_id, STATUS_SENDING)
            .await?;

        let campaign_name = campaign.name.clone();
        let on_progress = move |progress: SendProgress| match progress.status {
            ProgressStatus::Sending => log::info!(
                "(deliver_campaign) '{}' {}/{} -> {}",
                campaign_name,
                progress.current,
                progress.total,
                progress.label.as_deref().unwrap_or("?")
            ),
            ProgressStatus::Completed => log::info!(
                "(deliver_campaign) '{}' terminé ({} destinataires)",
                campaign_name,
                progress.total
            ),
        };

        let report = self
            .dispatch_service
            .send_bulk(
                &recipients,
                &campaign.content(),
                Some(&on_progress as &ProgressFn),
            )
            .await;

        self.campaign_service
            .record_results(campaign_id, &report, STATUS_COMPLETED)
            .await?;
        Ok(report)
    }

    /// Un passage du scheduler : traite chaque campagne arrivée à
    /// échéance. Retourne le nombre de campagnes traitées.
    pub async fn process_due_campaigns(&self) -> Result<usize> {
        let due = self.campaign_service.due_campaigns(Utc::now()).await?;
        if due.is_empty() {
            return Ok(0);
        }
        log::info!(
            "(process_due_campaigns) {} campagne(s) à échéance",
            due.len()
        );

        let mut processed = 0;
        for campaign in due {
            match self.deliver_campaign(&campaign.id).await {
                Ok(report) => {
                    processed += 1;
                    log::info!(
                        "(process_due_campaigns) '{}' délivrée: {} envoyés, {} en échec",
                        campaign.name,
                        report.sent,
                        report.failed
                    );
                }
                Err(e) => {
                    // L'échec d'une campagne ne bloque pas les suivantes.
                    log::error!(
                        "(process_due_campaigns) '{}' en échec: {:?}",
                        campaign.name,
                        e
                    );
                }
            }
        }
        Ok(processed)
    }

    /// Boucle de fond : un passage toutes les `interval_secs` secondes.
    pub async fn run_forever(&self, interval_secs: u64) {
        loop {
            if let Err(e) = self.process_due_campaigns().await {
                log::error!("(run_forever) Passage du scheduler en échec: {:?}", e);
            }
            tokio::time::sleep(std::time::Duration::from_secs(interval_secs)).await;
        }
    }
}
