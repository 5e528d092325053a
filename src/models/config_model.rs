//! models/config_model.rs
//! Identifiants du relais EmailJS (blob JSON persisté et miroir distant).

use serde::{Deserialize, Serialize};

/// Le triple d'identifiants exigé par le relais. Les noms de champs
/// suivent le format historique du blob (`serviceId`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayCredentials {
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub template_id: String,
    #[serde(default)]
    pub public_key: String,
}

impl RelayCredentials {
    /// Utilisable ssi les trois champs sont non vides.
    pub fn is_complete(&self) -> bool {
        !self.service_id.is_empty() && !self.template_id.is_empty() && !self.public_key.is_empty()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TestConfigRequest {
    pub email: String,
}
