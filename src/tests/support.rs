//! tests/support.rs
//! Doubles de test : relais en mémoire (enregistre les envois, échecs
//! injectables par adresse) et magasin de configuration en mémoire.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::config::mailer_config::MailerGlobalConfig;
use crate::models::config_model::RelayCredentials;
use crate::services::config_service::{ConfigService, ConfigStore};
use crate::services::dispatch_service::DispatchService;
use crate::services::relay_service::{MailRelay, RelayError, RelayParams, RelayResponse};

/// Relais factice : capture les paramètres envoyés, échoue pour les
/// adresses listées.
pub struct MockRelay {
    sent: Mutex<Vec<RelayParams>>,
    fail_for: Vec<String>,
    fail_text: String,
}

impl MockRelay {
    pub fn new() -> Self {
        MockRelay {
            sent: Mutex::new(Vec::new()),
            fail_for: vec![],
            fail_text: "Adresse rejetée par le relais".to_string(),
        }
    }

    pub fn failing_for(emails: &[&str]) -> Self {
        MockRelay {
            sent: Mutex::new(Vec::new()),
            fail_for: emails.iter().map(|e| e.to_string()).collect(),
            fail_text: "Adresse rejetée par le relais".to_string(),
        }
    }

    pub fn failing_for_with_text(emails: &[&str], text: &str) -> Self {
        MockRelay {
            sent: Mutex::new(Vec::new()),
            fail_for: emails.iter().map(|e| e.to_string()).collect(),
            fail_text: text.to_string(),
        }
    }

    pub async fn sent(&self) -> Vec<RelayParams> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl MailRelay for MockRelay {
    async fn init(&self, public_key: &str) -> Result<(), RelayError> {
        if public_key.is_empty() {
            return Err(RelayError::Init("Clé publique vide".to_string()));
        }
        Ok(())
    }

    async fn send(
        &self,
        _credentials: &RelayCredentials,
        params: &RelayParams,
    ) -> Result<RelayResponse, RelayError> {
        if self.fail_for.contains(&params.to_email) {
            return Err(RelayError::Api {
                status: 422,
                text: self.fail_text.clone(),
            });
        }
        self.sent.lock().await.push(params.clone());
        Ok(RelayResponse {
            status: 200,
            text: "OK".to_string(),
        })
    }
}

/// Magasin en mémoire, partageable entre le service et le test pour
/// inspecter ou corrompre le blob persisté.
pub struct MemoryStore {
    blob: Mutex<Option<String>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            blob: Mutex::new(None),
            fail_writes: false,
        }
    }

    pub fn failing_writes() -> Self {
        MemoryStore {
            blob: Mutex::new(None),
            fail_writes: true,
        }
    }

    pub async fn set_blob(&self, blob: &str) {
        *self.blob.lock().await = Some(blob.to_string());
    }

    pub async fn blob(&self) -> Option<String> {
        self.blob.lock().await.clone()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn read(&self) -> Result<Option<String>> {
        Ok(self.blob.lock().await.clone())
    }

    async fn write(&self, blob: &str) -> Result<()> {
        if self.fail_writes {
            return Err(anyhow!("Écriture refusée (test)"));
        }
        *self.blob.lock().await = Some(blob.to_string());
        Ok(())
    }
}

pub fn sample_credentials() -> RelayCredentials {
    RelayCredentials {
        service_id: "service_test".to_string(),
        template_id: "template_test".to_string(),
        public_key: "cle_publique_test".to_string(),
    }
}

pub fn empty_credentials() -> RelayCredentials {
    RelayCredentials {
        service_id: String::new(),
        template_id: String::new(),
        public_key: String::new(),
    }
}

/// Config de mailer avec cadence courte pour les tests.
pub fn test_mailer_config(send_delay_ms: u64) -> MailerGlobalConfig {
    MailerGlobalConfig {
        send_delay_ms,
        ..MailerGlobalConfig::default()
    }
}

/// Assemble un DispatchService sur doubles en mémoire. Retourne aussi
/// le relais et le service de configuration pour les assertions.
pub fn build_dispatch(
    relay: MockRelay,
    send_delay_ms: u64,
) -> (DispatchService, Arc<MockRelay>, ConfigService) {
    let relay = Arc::new(relay);
    let config_service = ConfigService::new(Arc::new(MemoryStore::new()), None);
    let dispatch = DispatchService::new(
        config_service.clone(),
        relay.clone(),
        test_mailer_config(send_delay_ms),
    );
    (dispatch, relay, config_service)
}
