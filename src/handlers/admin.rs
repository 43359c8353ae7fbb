// src/handlers/admin.rs
// DOCUMENTATION: Admin handlers for destructive place operations
// PURPOSE: Expose place deletion behind the admin token

use crate::config::Config;
use crate::db::PlaceStore;
use crate::errors::PlacesError;
use crate::models::{ApiResponse, ResponseCode};
use crate::services::PlaceService;
use actix_web::{web, HttpRequest, HttpResponse, Responder};

/// DELETE /admin/places/{id}
/// Delete a place and remove it from every wishlist
///
/// DOCUMENTATION: Requires admin authentication via X-Admin-Token header.
/// The wishlist cleanup and the place deletion commit together or not at all.
pub async fn delete_place(
    store: web::Data<dyn PlaceStore>,
    config: web::Data<Config>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> Result<impl Responder, PlacesError> {
    // Authenticate admin request
    verify_admin_token(&req, &config)?;

    let place_id = path.into_inner();
    log::info!("Admin delete requested for place: {}", place_id);

    let deleted = PlaceService::delete_place(store.get_ref(), place_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(ResponseCode::PlaceDeleted, deleted)))
}

/// Helper function to verify admin authentication
/// DOCUMENTATION: Checks X-Admin-Token header against configured admin token
fn verify_admin_token(req: &HttpRequest, config: &Config) -> Result<(), PlacesError> {
    let token = req
        .headers()
        .get("X-Admin-Token")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| {
            log::warn!("Admin request without token");
            PlacesError::Unauthorized
        })?;

    if token != config.admin_token {
        log::warn!("Admin request with invalid token");
        return Err(PlacesError::Forbidden);
    }

    Ok(())
}

/// Configuration for admin routes
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .app_data(web::PathConfig::default().error_handler(|err, _req| {
                PlacesError::InvalidInput(err.to_string()).into()
            }))
            .route("/places/{id}", web::delete().to(delete_place)),
    );
}
