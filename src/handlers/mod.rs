//! handlers/mod.rs
//! Module regroupant les handlers HTTP (config, campagnes, contacts).

pub mod campaign_handler;
pub mod config_handler;
pub mod contact_handler;
