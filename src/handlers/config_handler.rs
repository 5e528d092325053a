//! handlers/config_handler.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::models::config_model::{RelayCredentials, TestConfigRequest};
use crate::services::config_service::ConfigService;
use crate::services::dispatch_service::DispatchService;

/// GET /api/emailjs-config
pub async fn get_config_endpoint(config_service: web::Data<ConfigService>) -> HttpResponse {
    let creds = config_service.get().await;
    let configured = creds.is_complete();
    HttpResponse::Ok().json(json!({
        "success": true,
        "config": creds,
        "configured": configured
    }))
}

/// PUT /api/emailjs-config
pub async fn save_config_endpoint(
    config_service: web::Data<ConfigService>,
    body: web::Json<RelayCredentials>,
) -> HttpResponse {
    let creds = body.into_inner();
    let persisted = config_service.save(creds).await;

    if !persisted {
        log::warn!("(save_config_endpoint) Persistance locale en échec (cache à jour)");
    }
    // Le cache est remplacé dans tous les cas ; le booléen ne reflète
    // que la persistance locale.
    HttpResponse::Ok().json(json!({
        "success": true,
        "persisted": persisted
    }))
}

/// POST /api/emailjs-config/test
pub async fn test_config_endpoint(
    dispatch_service: web::Data<DispatchService>,
    body: web::Json<TestConfigRequest>,
) -> HttpResponse {
    let outcome = dispatch_service.test_config(&body.email).await;
    if !outcome.success {
        log::error!(
            "(test_config_endpoint) Test en échec: {}",
            outcome.error.as_deref().unwrap_or("?")
        );
    }
    HttpResponse::Ok().json(outcome)
}
