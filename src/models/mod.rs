//! models/mod.rs
//! Module racine des modèles/structures partagées.

pub mod campaign_model;
pub mod config_model;
pub mod contact_model;
pub mod dispatch_model;
