// src/handlers/health.rs
// DOCUMENTATION: Liveness check for the ulpet place directory
// PURPOSE: Report service name and build version; touches no store

use actix_web::{web, HttpResponse, Responder};
use serde_json::json;

/// GET /health
pub async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "service": "ulpet-places",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
