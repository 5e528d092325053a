//! app.rs
use crate::handlers::{campaign_handler, config_handler, contact_handler};
use actix_web::web;

pub fn init_app(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/emailjs-config")
                    .route("", web::get().to(config_handler::get_config_endpoint))
                    .route("", web::put().to(config_handler::save_config_endpoint))
                    .route("/test", web::post().to(config_handler::test_config_endpoint)),
            )
            .service(
                web::scope("/contacts")
                    .route("", web::get().to(contact_handler::list_contacts_endpoint))
                    .route("", web::post().to(contact_handler::create_contact_endpoint))
                    .route(
                        "/{id}",
                        web::delete().to(contact_handler::delete_contact_endpoint),
                    ),
            )
            .service(
                web::scope("/campaigns")
                    .route("", web::get().to(campaign_handler::list_campaigns_endpoint))
                    .route("", web::post().to(campaign_handler::create_campaign_endpoint))
                    // Avant /{id} pour ne pas capturer "send-email" comme id.
                    .route(
                        "/send-email",
                        web::post().to(campaign_handler::send_email_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::get().to(campaign_handler::get_campaign_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::put().to(campaign_handler::update_campaign_endpoint),
                    )
                    .route(
                        "/{id}",
                        web::delete().to(campaign_handler::delete_campaign_endpoint),
                    )
                    .route(
                        "/{id}/send",
                        web::post().to(campaign_handler::send_campaign_endpoint),
                    ),
            ),
    );
}
