//! models/dispatch_model.rs
//! Structures d'entrée/sortie du dispatcher (envoi unitaire et en masse).

use serde::{Deserialize, Serialize};

/// Destinataire d'un envoi. Lecture seule, jamais modifié.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipient {
    pub email: String,
    pub name: Option<String>,
}

/// Contenu d'une campagne tel que vu par le dispatcher :
/// le nom sert de sujet, le message peut contenir `{prénom}`.
#[derive(Debug, Clone)]
pub struct CampaignContent {
    pub name: String,
    pub message: String,
    pub media_url: Option<String>,
}

/// POST /api/campaigns/send-email (utilisé aussi par le scheduler).
#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailRequest {
    pub to_email: String,
    pub to_name: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub media_url: Option<String>,
}

/// Résultat d'une tentative d'envoi. Éphémère, non persisté.
#[derive(Debug, Clone, Serialize)]
pub struct SendOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SendOutcome {
    pub fn ok(response: String) -> Self {
        SendOutcome {
            success: true,
            response: Some(response),
            error: None,
        }
    }

    pub fn err(error: String) -> Self {
        SendOutcome {
            success: false,
            response: None,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Failed,
}

/// Ligne de détail d'un envoi en masse, dans l'ordre des destinataires.
#[derive(Debug, Clone, Serialize)]
pub struct RecipientOutcome {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Agrégat retourné par `send_bulk`. Jamais une erreur : les échecs
/// par destinataire sont capturés ici.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkReport {
    pub sent: usize,
    pub failed: usize,
    pub errors: Vec<String>,
    pub details: Vec<RecipientOutcome>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressStatus {
    Sending,
    Completed,
}

/// Notification de progression remise au callback de l'appelant.
#[derive(Debug, Clone, Serialize)]
pub struct SendProgress {
    pub current: usize,
    pub total: usize,
    pub status: ProgressStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Callback de progression optionnel (current, total, statut, libellé).
pub type ProgressFn<'a> = dyn Fn(SendProgress) + Send + Sync + 'a;
