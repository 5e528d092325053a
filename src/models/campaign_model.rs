//! models/campaign_model.rs
//! Campagnes marketing persistées (table `campaigns`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::dispatch_model::CampaignContent;

/// Statuts du cycle de vie d'une campagne.
pub const STATUS_DRAFT: &str = "draft";
pub const STATUS_SCHEDULED: &str = "scheduled";
pub const STATUS_SENDING: &str = "sending";
pub const STATUS_COMPLETED: &str = "completed";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: String,
    pub name: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    /// "all" ou "selected"
    pub target_type: String,
    pub selected_contacts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<String>,
    pub status: String,
    pub sent_count: i64,
    pub failed_count: i64,
    /// Détails du dernier envoi (lignes par destinataire).
    pub results: Value,
    pub created_at: String,
    pub updated_at: String,
}

impl Campaign {
    pub fn content(&self) -> CampaignContent {
        CampaignContent {
            name: self.name.clone(),
            message: self.message.clone(),
            media_url: self.media_url.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default = "default_target_type")]
    pub target_type: String,
    #[serde(default)]
    pub selected_contacts: Vec<String>,
    /// Date ISO pour un envoi programmé, absent = brouillon.
    #[serde(default)]
    pub scheduled_at: Option<String>,
}

fn default_target_type() -> String {
    "all".to_string()
}

/// PUT /api/campaigns/{id} : mise à jour partielle.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
    pub message: Option<String>,
    pub media_url: Option<String>,
    pub target_type: Option<String>,
    pub selected_contacts: Option<Vec<String>>,
    pub scheduled_at: Option<String>,
    pub status: Option<String>,
}
