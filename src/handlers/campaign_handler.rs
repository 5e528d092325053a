//! handlers/campaign_handler.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::models::campaign_model::{CreateCampaignRequest, UpdateCampaignRequest};
use crate::models::dispatch_model::SendEmailRequest;
use crate::services::campaign_service::CampaignService;
use crate::services::dispatch_service::DispatchService;
use crate::services::scheduler_service::SchedulerService;

/// GET /api/campaigns
pub async fn list_campaigns_endpoint(campaign_service: web::Data<CampaignService>) -> HttpResponse {
    match campaign_service.list_campaigns().await {
        Ok(campaigns) => HttpResponse::Ok().json(campaigns),
        Err(e) => {
            log::error!("(list_campaigns_endpoint) {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}

/// POST /api/campaigns
pub async fn create_campaign_endpoint(
    campaign_service: web::Data<CampaignService>,
    body: web::Json<CreateCampaignRequest>,
) -> HttpResponse {
    match campaign_service.create_campaign(body.into_inner()).await {
        Ok(campaign) => HttpResponse::Ok().json(campaign),
        Err(e) => {
            log::error!("(create_campaign_endpoint) {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}

/// GET /api/campaigns/{id}
pub async fn get_campaign_endpoint(
    campaign_service: web::Data<CampaignService>,
    path: web::Path<String>,
) -> HttpResponse {
    let campaign_id = path.into_inner();
    match campaign_service.get_campaign(&campaign_id).await {
        Ok(Some(campaign)) => HttpResponse::Ok().json(campaign),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "Campagne introuvable"
        })),
        Err(e) => {
            log::error!("(get_campaign_endpoint) {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}

/// PUT /api/campaigns/{id}
pub async fn update_campaign_endpoint(
    campaign_service: web::Data<CampaignService>,
    path: web::Path<String>,
    body: web::Json<UpdateCampaignRequest>,
) -> HttpResponse {
    let campaign_id = path.into_inner();
    match campaign_service
        .update_campaign(&campaign_id, body.into_inner())
        .await
    {
        Ok(Some(campaign)) => HttpResponse::Ok().json(campaign),
        Ok(None) => HttpResponse::NotFound().json(json!({
            "success": false,
            "error": "Campagne introuvable"
        })),
        Err(e) => {
            log::error!("(update_campaign_endpoint) {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}

/// DELETE /api/campaigns/{id}
pub async fn delete_campaign_endpoint(
    campaign_service: web::Data<CampaignService>,
    path: web::Path<String>,
) -> HttpResponse {
    match campaign_service.delete_campaign(&path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e) => {
            log::error!("(delete_campaign_endpoint) {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}

/// POST /api/campaigns/{id}/send
/// Lance la délivrance en tâche de fond ; les résultats sont consultables
/// ensuite sur la campagne (statut `sending` puis `completed`).
pub async fn send_campaign_endpoint(
    scheduler_service: web::Data<SchedulerService>,
    path: web::Path<String>,
) -> HttpResponse {
    let campaign_id = path.into_inner();

    let scheduler = scheduler_service.get_ref().clone();
    let task_id = campaign_id.clone();
    tokio::spawn(async move {
        match scheduler.deliver_campaign(&task_id).await {
            Ok(report) => log::info!(
                "(send_campaign_endpoint) Campagne {} délivrée: {} envoyés, {} en échec",
                task_id,
                report.sent,
                report.failed
            ),
            Err(e) => log::error!(
                "(send_campaign_endpoint) Campagne {} en échec: {:?}",
                task_id,
                e
            ),
        }
    });

    HttpResponse::Ok().json(json!({
        "success": true,
        "campaignId": campaign_id,
        "status": "sending"
    }))
}

/// POST /api/campaigns/send-email — envoi unitaire (utilisé entre autres
/// par le scheduler historique).
pub async fn send_email_endpoint(
    dispatch_service: web::Data<DispatchService>,
    body: web::Json<SendEmailRequest>,
) -> HttpResponse {
    match dispatch_service.send_one(&body.into_inner()).await {
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => {
            log::error!("(send_email_endpoint) {}", e);
            HttpResponse::BadRequest().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}
