//! services/config_service.rs
//! Magasin de configuration du relais : cache en mémoire, persistance
//! locale du blob JSON, et miroir distant best-effort (jamais attendu).

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::RwLock;

use crate::config::mailer_config;
use crate::models::config_model::RelayCredentials;

/// Stockage clé/valeur local du blob d'identifiants.
/// Injectable pour que les tests utilisent un magasin en mémoire.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    async fn read(&self) -> Result<Option<String>>;
    async fn write(&self, blob: &str) -> Result<()>;
}

/// Persistance sur disque : un fichier JSON sous le répertoire data.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        FileStore { path }
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn read(&self) -> Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).context("Lecture du blob de configuration impossible"),
        }
    }

    async fn write(&self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .context("Création du répertoire de configuration impossible")?;
        }
        tokio::fs::write(&self.path, blob)
            .await
            .context("Écriture du blob de configuration impossible")?;
        Ok(())
    }
}

#[derive(Clone)]
pub struct ConfigService {
    cache: Arc<RwLock<Option<RelayCredentials>>>,
    store: Arc<dyn ConfigStore>,
    defaults: RelayCredentials,
    http_client: Client,
    /// Base du miroir distant (PUT <base>/api/emailjs-config), optionnel.
    sync_base_url: Option<String>,
}

impl ConfigService {
    pub fn new(store: Arc<dyn ConfigStore>, sync_base_url: Option<String>) -> Self {
        ConfigService {
            cache: Arc::new(RwLock::new(None)),
            store,
            defaults: mailer_config::default_credentials(),
            http_client: Client::new(),
            sync_base_url,
        }
    }

    /// Retourne les identifiants courants. Ne peut pas échouer :
    /// blob absent ou illisible => valeurs par défaut embarquées.
    pub async fn get(&self) -> RelayCredentials {
        if let Some(creds) = self.cache.read().await.clone() {
            return creds;
        }

        let creds = match self.store.read().await {
            Ok(Some(blob)) => match serde_json::from_str::<RelayCredentials>(&blob) {
                Ok(creds) => creds,
                Err(e) => {
                    log::warn!("(get) Blob de configuration illisible: {}", e);
                    self.defaults.clone()
                }
            },
            Ok(None) => self.defaults.clone(),
            Err(e) => {
                log::warn!("(get) Lecture du magasin local en échec: {:?}", e);
                self.defaults.clone()
            }
        };

        *self.cache.write().await = Some(creds.clone());
        creds
    }

    /// Remplace le cache immédiatement (visible par les `get` suivants),
    /// persiste localement, puis pousse vers le miroir distant sans
    /// attendre ni propager son résultat. Le booléen retourné ne reflète
    /// que la persistance locale.
    pub async fn save(&self, creds: RelayCredentials) -> bool {
        *self.cache.write().await = Some(creds.clone());

        let persisted = match serde_json::to_string(&creds) {
            Ok(blob) => match self.store.write(&blob).await {
                Ok(()) => true,
                Err(e) => {
                    log::error!("(save) Persistance locale en échec: {:?}", e);
                    false
                }
            },
            Err(e) => {
                log::error!("(save) Sérialisation des identifiants en échec: {}", e);
                false
            }
        };

        self.spawn_remote_sync(creds);
        persisted
    }

    /// Vrai ssi les trois champs sont non vides.
    pub async fn is_configured(&self) -> bool {
        self.get().await.is_complete()
    }

    /// Réplication best-effort : tâche détachée, erreurs loguées puis
    /// avalées. Jamais attendue par `save`.
    fn spawn_remote_sync(&self, creds: RelayCredentials) {
        let base_url = match &self.sync_base_url {
            Some(url) => url.clone(),
            None => return,
        };
        let client = self.http_client.clone();

        tokio::spawn(async move {
            let url = format!("{}/api/emailjs-config", base_url.trim_end_matches('/'));
            match client.put(&url).json(&creds).send().await {
                Ok(resp) if resp.status().is_success() => {
                    log::info!("(spawn_remote_sync) Miroir distant à jour");
                }
                Ok(resp) => {
                    log::warn!(
                        "(spawn_remote_sync) Miroir distant en échec: HTTP {}",
                        resp.status()
                    );
                }
                Err(e) => {
                    log::warn!("(spawn_remote_sync) Miroir distant injoignable: {}", e);
                }
            }
        });
    }
}
