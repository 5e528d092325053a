//! tests/config_tests.rs
//! Tests du magasin de configuration (cache, persistance, valeurs par
//! défaut, magasin fichier).

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_rt::test;

    use crate::config::mailer_config;
    use crate::services::config_service::{ConfigService, ConfigStore, FileStore};
    use crate::tests::support::{empty_credentials, sample_credentials, MemoryStore};

    #[test]
    async fn test_get_returns_defaults_when_nothing_persisted() {
        let service = ConfigService::new(Arc::new(MemoryStore::new()), None);

        let creds = service.get().await;
        assert_eq!(creds, mailer_config::default_credentials());
        // Les valeurs embarquées sont complètes.
        assert!(service.is_configured().await);
    }

    #[test]
    async fn test_get_falls_back_to_defaults_on_corrupt_blob() {
        let store = Arc::new(MemoryStore::new());
        store.set_blob("pas du json {{{").await;
        let service = ConfigService::new(store, None);

        let creds = service.get().await;
        assert_eq!(creds, mailer_config::default_credentials());
    }

    #[test]
    async fn test_save_then_get_returns_saved_value() {
        let store = Arc::new(MemoryStore::new());
        let service = ConfigService::new(store.clone(), None);

        let creds = sample_credentials();
        let persisted = service.save(creds.clone()).await;
        assert!(persisted);
        assert_eq!(service.get().await, creds);

        // Le blob persisté est bien le JSON camelCase attendu.
        let blob = store.blob().await.expect("blob absent");
        assert!(blob.contains("\"serviceId\":\"service_test\""));
    }

    #[test]
    async fn test_save_updates_cache_even_when_persistence_fails() {
        let service = ConfigService::new(Arc::new(MemoryStore::failing_writes()), None);

        let creds = sample_credentials();
        let persisted = service.save(creds.clone()).await;
        assert!(!persisted);
        // Le cache est remplacé malgré l'échec de persistance.
        assert_eq!(service.get().await, creds);
    }

    #[test]
    async fn test_get_reads_from_cache_after_first_load() {
        let store = Arc::new(MemoryStore::new());
        store
            .set_blob(&serde_json::to_string(&sample_credentials()).unwrap())
            .await;
        let service = ConfigService::new(store.clone(), None);

        assert_eq!(service.get().await, sample_credentials());

        // Modifier le magasin sous-jacent ne change pas le cache.
        store.set_blob("{\"serviceId\":\"autre\"}").await;
        assert_eq!(service.get().await, sample_credentials());
    }

    #[test]
    async fn test_is_configured_requires_all_three_fields() {
        let service = ConfigService::new(Arc::new(MemoryStore::new()), None);

        service.save(empty_credentials()).await;
        assert!(!service.is_configured().await);

        let mut partial = sample_credentials();
        partial.public_key = String::new();
        service.save(partial).await;
        assert!(!service.is_configured().await);

        service.save(sample_credentials()).await;
        assert!(service.is_configured().await);
    }

    #[test]
    async fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("emailjs_config.json");
        let store = FileStore::new(path);

        assert!(store.read().await.expect("read").is_none());

        store.write("{\"serviceId\":\"s\"}").await.expect("write");
        let blob = store.read().await.expect("read").expect("blob absent");
        assert_eq!(blob, "{\"serviceId\":\"s\"}");
    }

    #[test]
    async fn test_file_store_backs_config_service() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("emailjs_config.json");

        let service = ConfigService::new(Arc::new(FileStore::new(path.clone())), None);
        assert!(service.save(sample_credentials()).await);

        // Un second service sur le même fichier relit la même valeur.
        let reloaded = ConfigService::new(Arc::new(FileStore::new(path)), None);
        assert_eq!(reloaded.get().await, sample_credentials());
    }

    #[test]
    async fn test_credentials_blob_tolerates_missing_fields() {
        let store = Arc::new(MemoryStore::new());
        store.set_blob("{\"serviceId\":\"seul\"}").await;
        let service = ConfigService::new(store, None);

        let creds = service.get().await;
        assert_eq!(creds.service_id, "seul");
        assert!(creds.template_id.is_empty());
        assert!(!service.is_configured().await);
    }
}
