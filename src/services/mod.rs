//! services/mod.rs
//! Module regroupant les "services" (couches métier) de l'application.

pub mod campaign_service;
pub mod config_service;
pub mod contact_service;
pub mod dispatch_service;
pub mod relay_service;
pub mod scheduler_service;
