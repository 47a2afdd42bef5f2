//! HTTP host for the AIDA assistant.
//!
//! Exposes `/health`, `/chat`, and `/history/<session_id>` over rocket with a
//! CORS fairing for the configured browser origins.

mod cors;
mod error;
mod routes;

pub use cors::Cors;
pub use error::ApiError;

use aida_rs_config::ServerConfig;
use aida_rs_core::Assistant;
use log::info;
use rocket::{Build, Rocket};
use std::sync::Arc;

/// Build a rocket instance serving `assistant` with settings from `config`.
pub fn build_rocket(assistant: Arc<Assistant>, config: &ServerConfig) -> Rocket<Build> {
    info!(
        "configuring http server (address={}, port={}, allowed_origins={})",
        config.address,
        config.port,
        config.allowed_origins.len()
    );
    let figment = rocket::Config::figment()
        .merge(("address", config.address.clone()))
        .merge(("port", config.port));
    rocket::custom(figment)
        .manage(assistant)
        .attach(Cors::new(config.allowed_origins.clone()))
        .mount("/", routes::routes())
        .register("/", routes::catchers())
}
