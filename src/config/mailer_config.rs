//! config/mailer_config.rs
//! Valeurs globales du mailer (expéditeur, relais, cadence d'envoi).

use serde::{Deserialize, Serialize};

use crate::models::config_model::RelayCredentials;

/// URL du relais EmailJS (surchargable via EMAILJS_API_URL).
pub const EMAILJS_API_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// Configuration globale du mailer, avec valeurs par défaut
/// (l'identité d'expéditeur est fixe côté produit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailerGlobalConfig {
    pub sender_name: String,
    pub reply_to: String,
    pub default_subject: String,
    pub default_recipient_name: String,
    /// Pause entre deux envois d'une même campagne (anti-abus du relais).
    pub send_delay_ms: u64,
}

impl Default for MailerGlobalConfig {
    fn default() -> Self {
        MailerGlobalConfig {
            sender_name: "Afroboost".to_string(),
            reply_to: "contact.artboost@gmail.com".to_string(),
            default_subject: "Afroboost - Message".to_string(),
            default_recipient_name: "Client".to_string(),
            send_delay_ms: 300,
        }
    }
}

/// Identifiants EmailJS embarqués, utilisés seulement quand aucune
/// configuration n'a été persistée (jamais comme état global caché).
pub fn default_credentials() -> RelayCredentials {
    RelayCredentials {
        service_id: "service_afroboost".to_string(),
        template_id: "template_campagne".to_string(),
        public_key: "Xq4mP9zRbW2cD1eF3".to_string(),
    }
}
