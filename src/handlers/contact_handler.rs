//! handlers/contact_handler.rs

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::models::contact_model::CreateContactRequest;
use crate::services::contact_service::ContactService;

/// GET /api/contacts
pub async fn list_contacts_endpoint(contact_service: web::Data<ContactService>) -> HttpResponse {
    match contact_service.list_contacts().await {
        Ok(contacts) => HttpResponse::Ok().json(contacts),
        Err(e) => {
            log::error!("(list_contacts_endpoint) {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}

/// POST /api/contacts
pub async fn create_contact_endpoint(
    contact_service: web::Data<ContactService>,
    body: web::Json<CreateContactRequest>,
) -> HttpResponse {
    match contact_service.create_contact(body.into_inner()).await {
        Ok(contact) => HttpResponse::Ok().json(contact),
        Err(e) => {
            log::error!("(create_contact_endpoint) {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}

/// DELETE /api/contacts/{id}
pub async fn delete_contact_endpoint(
    contact_service: web::Data<ContactService>,
    path: web::Path<String>,
) -> HttpResponse {
    match contact_service.delete_contact(&path.into_inner()).await {
        Ok(()) => HttpResponse::Ok().json(json!({"success": true})),
        Err(e) => {
            log::error!("(delete_contact_endpoint) {:?}", e);
            HttpResponse::InternalServerError().json(json!({
                "success": false,
                "error": e.to_string()
            }))
        }
    }
}
