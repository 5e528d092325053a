//! services/relay_service.rs
//! Accès au relais d'envoi hébergé (EmailJS) derrière un trait,
//! pour pouvoir substituer un faux relais dans les tests.

use std::fmt;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::models::config_model::RelayCredentials;

/// Message générique quand le relais ne fournit aucun texte exploitable.
pub const RELAY_FALLBACK_ERROR: &str = "Erreur d'envoi du message";

#[derive(Debug)]
pub enum RelayError {
    /// Initialisation du client impossible (clé publique vide, etc.).
    Init(String),
    /// Échec de transport (réseau, timeout).
    Transport(String),
    /// Le relais a répondu avec un statut d'erreur.
    Api { status: u16, text: String },
}

impl RelayError {
    /// Texte d'erreur à remonter à l'appelant, dans l'ordre :
    /// texte fourni par le relais, sinon message générique,
    /// sinon chaîne de repli fixe.
    pub fn error_text(&self) -> String {
        match self {
            RelayError::Api { text, .. } if !text.trim().is_empty() => text.clone(),
            RelayError::Api { status, .. } => format!("Relais HTTP {}", status),
            RelayError::Transport(msg) | RelayError::Init(msg) if !msg.trim().is_empty() => {
                msg.clone()
            }
            _ => RELAY_FALLBACK_ERROR.to_string(),
        }
    }
}

impl fmt::Display for RelayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelayError::Init(msg) => write!(f, "Init error: {}", msg),
            RelayError::Transport(msg) => write!(f, "Transport error: {}", msg),
            RelayError::Api { status, text } => write!(f, "Relay error ({}): {}", status, text),
        }
    }
}

impl std::error::Error for RelayError {}

/// Paramètres de gabarit transmis au relais pour un envoi.
#[derive(Debug, Clone, Serialize)]
pub struct RelayParams {
    pub to_email: String,
    pub to_name: String,
    pub subject: String,
    pub message: String,
    pub from_name: String,
    pub reply_to: String,
}

#[derive(Debug, Clone)]
pub struct RelayResponse {
    pub status: u16,
    pub text: String,
}

/// Capacité externe "envoyer un email" (contrat, pas réimplémentée).
#[async_trait]
pub trait MailRelay: Send + Sync {
    /// Initialise le client avec la clé publique. Idempotent.
    async fn init(&self, public_key: &str) -> Result<(), RelayError>;

    /// Envoie un message via (service, template, params, clé publique).
    async fn send(
        &self,
        credentials: &RelayCredentials,
        params: &RelayParams,
    ) -> Result<RelayResponse, RelayError>;
}

/// Implémentation de production : POST sur l'API REST EmailJS.
pub struct EmailJsRelay {
    http_client: Client,
    api_url: String,
    /// Clé publique déjà initialisée (init idempotent).
    inited_key: RwLock<Option<String>>,
}

#[derive(Serialize)]
struct EmailJsPayload<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a RelayParams,
}

impl EmailJsRelay {
    pub fn new(api_url: String) -> Self {
        EmailJsRelay {
            http_client: Client::new(),
            api_url,
            inited_key: RwLock::new(None),
        }
    }
}

#[async_trait]
impl MailRelay for EmailJsRelay {
    async fn init(&self, public_key: &str) -> Result<(), RelayError> {
        if public_key.is_empty() {
            return Err(RelayError::Init("Clé publique EmailJS vide".to_string()));
        }

        let mut inited = self.inited_key.write().await;
        if inited.as_deref() == Some(public_key) {
            return Ok(());
        }
        *inited = Some(public_key.to_string());
        log::info!("(init) Client EmailJS initialisé");
        Ok(())
    }

    async fn send(
        &self,
        credentials: &RelayCredentials,
        params: &RelayParams,
    ) -> Result<RelayResponse, RelayError> {
        let payload = EmailJsPayload {
            service_id: &credentials.service_id,
            template_id: &credentials.template_id,
            user_id: &credentials.public_key,
            template_params: params,
        };

        let resp = self
            .http_client
            .post(&self.api_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if status.is_success() {
            Ok(RelayResponse {
                status: status.as_u16(),
                text,
            })
        } else {
            Err(RelayError::Api {
                status: status.as_u16(),
                text,
            })
        }
    }
}
