//! services/dispatch_service.rs
//! Dispatcher : personnalisation du message, envoi unitaire, envoi en
//! masse séquentiel avec cadence fixe et agrégation des résultats.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::mailer_config::MailerGlobalConfig;
use crate::models::config_model::RelayCredentials;
use crate::models::dispatch_model::{
    BulkReport, CampaignContent, DeliveryStatus, ProgressFn, ProgressStatus, Recipient,
    RecipientOutcome, SendEmailRequest, SendOutcome, SendProgress,
};
use crate::services::config_service::ConfigService;
use crate::services::relay_service::{MailRelay, RelayParams, RELAY_FALLBACK_ERROR};

/// Marqueur remplacé par le prénom du destinataire (insensible à la casse).
const PLACEHOLDER: &str = "{prénom}";

/// Message fixe quand les identifiants du relais sont absents.
pub const CONFIG_MISSING_ERROR: &str = "Configuration EmailJS manquante";

/// Identifiants absents ou incomplets. Seule erreur que `send_one`
/// remonte ; les échecs du relais deviennent des `SendOutcome`.
#[derive(Debug)]
pub struct NotConfiguredError;

impl fmt::Display for NotConfiguredError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", CONFIG_MISSING_ERROR)
    }
}

impl std::error::Error for NotConfiguredError {}

#[derive(Clone)]
pub struct DispatchService {
    config_service: ConfigService,
    relay: Arc<dyn MailRelay>,
    mailer_config: MailerGlobalConfig,
    send_delay: Duration,
}

impl DispatchService {
    pub fn new(
        config_service: ConfigService,
        relay: Arc<dyn MailRelay>,
        mailer_config: MailerGlobalConfig,
    ) -> Self {
        let send_delay = Duration::from_millis(mailer_config.send_delay_ms);
        DispatchService {
            config_service,
            relay,
            mailer_config,
            send_delay,
        }
    }

    /// Initialise le client du relais avec la clé publique courante.
    /// Idempotent ; les erreurs sont loguées, jamais propagées.
    pub async fn init_relay(&self) -> bool {
        let creds = self.config_service.get().await;
        match self.relay.init(&creds.public_key).await {
            Ok(()) => true,
            Err(e) => {
                log::error!("(init_relay) Initialisation du relais en échec: {}", e);
                false
            }
        }
    }

    /// Envoi unitaire. Échoue seulement si la configuration manque ;
    /// un refus du relais est retourné comme `{success:false, error}`.
    pub async fn send_one(&self, req: &SendEmailRequest) -> Result<SendOutcome, NotConfiguredError> {
        if !self.config_service.is_configured().await {
            return Err(NotConfiguredError);
        }
        self.init_relay().await;

        let creds = self.config_service.get().await;
        let outcome = self.send_with_credentials(&creds, req).await;
        Ok(outcome)
    }

    /// Envoi en masse, strictement séquentiel dans l'ordre d'entrée.
    /// Ne retourne jamais une erreur : tout échec par destinataire est
    /// capturé dans le rapport.
    pub async fn send_bulk(
        &self,
        recipients: &[Recipient],
        campaign: &CampaignContent,
        on_progress: Option<&ProgressFn<'_>>,
    ) -> BulkReport {
        let mut report = BulkReport::default();
        if recipients.is_empty() {
            return report;
        }

        // Précondition : sans configuration, tout le lot échoue sans
        // aucun appel réseau ni callback de progression.
        if !self.config_service.is_configured().await {
            log::error!("(send_bulk) {}", CONFIG_MISSING_ERROR);
            for recipient in recipients {
                report.failed += 1;
                report
                    .errors
                    .push(format!("{}: {}", recipient.email, CONFIG_MISSING_ERROR));
                report.details.push(RecipientOutcome {
                    email: recipient.email.clone(),
                    name: recipient.name.clone(),
                    status: DeliveryStatus::Failed,
                    error: Some(CONFIG_MISSING_ERROR.to_string()),
                });
            }
            return report;
        }

        self.init_relay().await;
        let creds = self.config_service.get().await;
        let total = recipients.len();

        for (idx, recipient) in recipients.iter().enumerate() {
            // Cadence fixe entre deux envois (pas après le dernier) :
            // politique anti-abus du relais, pas une optimisation.
            if idx > 0 {
                tokio::time::sleep(self.send_delay).await;
            }

            if let Some(callback) = on_progress {
                let label = recipient
                    .name
                    .clone()
                    .unwrap_or_else(|| recipient.email.clone());
                callback(SendProgress {
                    current: idx + 1,
                    total,
                    status: ProgressStatus::Sending,
                    label: Some(label),
                });
            }

            let req = SendEmailRequest {
                to_email: recipient.email.clone(),
                to_name: recipient.name.clone(),
                subject: Some(campaign.name.clone()),
                message: campaign.message.clone(),
                media_url: campaign.media_url.clone(),
            };

            let outcome = self.send_with_credentials(&creds, &req).await;
            if outcome.success {
                report.sent += 1;
                report.details.push(RecipientOutcome {
                    email: recipient.email.clone(),
                    name: recipient.name.clone(),
                    status: DeliveryStatus::Sent,
                    error: None,
                });
            } else {
                let error = outcome
                    .error
                    .unwrap_or_else(|| RELAY_FALLBACK_ERROR.to_string());
                report.failed += 1;
                report
                    .errors
                    .push(format!("{}: {}", recipient.email, error));
                report.details.push(RecipientOutcome {
                    email: recipient.email.clone(),
                    name: recipient.name.clone(),
                    status: DeliveryStatus::Failed,
                    error: Some(error),
                });
            }
        }

        if let Some(callback) = on_progress {
            callback(SendProgress {
                current: total,
                total,
                status: ProgressStatus::Completed,
                label: None,
            });
        }

        log::info!(
            "(send_bulk) Terminé: {} envoyés, {} en échec sur {}",
            report.sent,
            report.failed,
            total
        );
        report
    }

    /// Sonde de configuration : envoie un message de diagnostic fixe.
    /// Retourne un échec structuré (jamais une erreur) si la
    /// configuration est incomplète.
    pub async fn test_config(&self, test_email: &str) -> SendOutcome {
        if !self.config_service.is_configured().await {
            return SendOutcome::err(CONFIG_MISSING_ERROR.to_string());
        }
        self.init_relay().await;

        let creds = self.config_service.get().await;
        let req = SendEmailRequest {
            to_email: test_email.to_string(),
            to_name: Some("Test Afroboost".to_string()),
            subject: Some("Test de configuration Afroboost".to_string()),
            message: "Ceci est un message de test. Si vous le recevez, \
                      la configuration EmailJS est opérationnelle."
                .to_string(),
            media_url: None,
        };
        self.send_with_credentials(&creds, &req).await
    }

    async fn send_with_credentials(
        &self,
        creds: &RelayCredentials,
        req: &SendEmailRequest,
    ) -> SendOutcome {
        let mut message = personalize(&req.message, req.to_name.as_deref());

        if let Some(media_url) = req.media_url.as_deref() {
            if !media_url.is_empty() {
                message.push_str("\n\n👉 Voir le média : ");
                message.push_str(media_url);
            }
        }

        let params = RelayParams {
            to_email: req.to_email.clone(),
            to_name: req
                .to_name
                .clone()
                .unwrap_or_else(|| self.mailer_config.default_recipient_name.clone()),
            subject: req
                .subject
                .clone()
                .unwrap_or_else(|| self.mailer_config.default_subject.clone()),
            message,
            from_name: self.mailer_config.sender_name.clone(),
            reply_to: self.mailer_config.reply_to.clone(),
        };

        match self.relay.send(creds, &params).await {
            Ok(resp) => {
                log::info!("(send_with_credentials) Envoyé à {}", req.to_email);
                SendOutcome::ok(resp.text)
            }
            Err(e) => {
                log::error!(
                    "(send_with_credentials) Échec pour {}: {}",
                    req.to_email,
                    e
                );
                SendOutcome::err(e.error_text())
            }
        }
    }
}

/// Remplace chaque occurrence du marqueur par le premier mot du nom du
/// destinataire. Sans nom, le marqueur reste tel quel dans le message
/// sortant (comportement assumé, pas un défaut).
pub fn personalize(message: &str, recipient_name: Option<&str>) -> String {
    let first_name = recipient_name.and_then(|name| name.split_whitespace().next());
    match first_name {
        Some(first) => replace_case_insensitive(message, PLACEHOLDER, first),
        None => message.to_string(),
    }
}

/// Longueur en octets du préfixe de `haystack` qui correspond à
/// `needle` sans tenir compte de la casse, s'il existe.
fn ci_prefix_len(haystack: &str, needle: &str) -> Option<usize> {
    let mut len = 0;
    let mut haystack_chars = haystack.chars();
    for needle_char in needle.chars() {
        let c = haystack_chars.next()?;
        if !c.to_lowercase().eq(needle_char.to_lowercase()) {
            return None;
        }
        len += c.len_utf8();
    }
    Some(len)
}

fn replace_case_insensitive(haystack: &str, needle: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(haystack.len());
    let mut rest = haystack;
    while let Some(c) = rest.chars().next() {
        if let Some(matched) = ci_prefix_len(rest, needle) {
            out.push_str(replacement);
            rest = &rest[matched..];
        } else {
            out.push(c);
            rest = &rest[c.len_utf8()..];
        }
    }
    out
}
