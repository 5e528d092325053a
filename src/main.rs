use std::sync::Arc;

use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use sqlx::{Pool, Sqlite};

use crate::config::mailer_config::{MailerGlobalConfig, EMAILJS_API_URL};
use crate::logger::init_logger;
use crate::services::campaign_service::CampaignService;
use crate::services::config_service::{ConfigService, FileStore};
use crate::services::contact_service::ContactService;
use crate::services::dispatch_service::DispatchService;
use crate::services::relay_service::EmailJsRelay;
use crate::services::scheduler_service::SchedulerService;

mod app;
mod config;
mod handlers;
mod logger;
mod models;
mod services;
#[cfg(test)]
mod tests;

/// Passage du scheduler toutes les 60 secondes.
const SCHEDULER_INTERVAL_SECS: u64 = 60;

async fn setup_database() -> Pool<Sqlite> {
    // 1) Créer le dossier "data"
    std::fs::create_dir_all("data").expect("Impossible de créer le répertoire 'data'");

    // 2) Chemin final : ./data/campaigns.db
    let db_path = std::env::current_dir()
        .expect("Impossible d'obtenir le current_dir")
        .join("data")
        .join("campaigns.db");
    let db_url = format!("sqlite:{}?mode=rwc", db_path.to_string_lossy());

    log::info!("Connexion à SQLite sur {}", db_url);

    // 3) Connexion via SQLx
    Pool::<Sqlite>::connect(&db_url)
        .await
        .expect("Connexion à la base SQLite impossible.")
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Charger .env au démarrage
    init_logger();

    let db_pool = setup_database().await;

    // ConfigService : blob JSON local + miroir distant optionnel
    let config_path = std::path::PathBuf::from("data").join("emailjs_config.json");
    let sync_base_url = std::env::var("CONFIG_SYNC_URL").ok().filter(|u| !u.is_empty());
    let config_service = ConfigService::new(Arc::new(FileStore::new(config_path)), sync_base_url);

    // Relais EmailJS (URL surchargable pour les environnements de test)
    let api_url = std::env::var("EMAILJS_API_URL").unwrap_or_else(|_| EMAILJS_API_URL.to_string());
    let relay = Arc::new(EmailJsRelay::new(api_url));

    let dispatch_service = DispatchService::new(
        config_service.clone(),
        relay,
        MailerGlobalConfig::default(),
    );

    // Contacts et campagnes (sqlite)
    let contact_service = ContactService::new(db_pool.clone());
    let campaign_service = CampaignService::new(db_pool.clone(), contact_service.clone());
    if let Err(e) = campaign_service.run_migrations().await {
        panic!("Échec des migrations: {:?}", e);
    }

    let scheduler_service = SchedulerService::new(campaign_service.clone(), dispatch_service.clone());

    // Boucle de fond pour les campagnes programmées
    let scheduler_clone = scheduler_service.clone();
    tokio::spawn(async move {
        scheduler_clone.run_forever(SCHEDULER_INTERVAL_SECS).await;
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8001".to_string());
    log::info!("Démarrage du serveur sur {}", bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(config_service.clone()))
            .app_data(web::Data::new(dispatch_service.clone()))
            .app_data(web::Data::new(contact_service.clone()))
            .app_data(web::Data::new(campaign_service.clone()))
            .app_data(web::Data::new(scheduler_service.clone()))
            .configure(app::init_app)
    })
    .workers(1)
    .bind(bind_addr)?
    .run()
    .await
}
