// src/handlers/places.rs
// DOCUMENTATION: HTTP handlers for place operations
// PURPOSE: Parse requests, call services, return responses

use crate::config::Config;
use crate::db::PlaceStore;
use crate::errors::PlacesError;
use crate::models::{ApiResponse, NewPlacesQuery, ResponseCode, SearchQuery};
use crate::services::PlaceService;
use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

/// GET /v1/search
/// Search places by category, feature and keyword
pub async fn search_places(
    store: web::Data<dyn PlaceStore>,
    query: web::Query<SearchQuery>,
) -> Result<impl Responder, PlacesError> {
    if let Err(e) = query.validate() {
        return Err(PlacesError::ValidationError(e.to_string()));
    }

    let places = PlaceService::search_places(store.get_ref(), query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(ResponseCode::PlaceSearch, places)))
}

/// GET /v1/places/new
/// Newly registered places, newest first
pub async fn new_places(
    store: web::Data<dyn PlaceStore>,
    config: web::Data<Config>,
    query: web::Query<NewPlacesQuery>,
) -> Result<impl Responder, PlacesError> {
    let limit = config.new_places_limit(query.limit);
    let places = PlaceService::new_register_places(store.get_ref(), limit).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(ResponseCode::NewPlaces, places)))
}

/// GET /v1/places/{id}
/// Retrieve a place with its representative image
pub async fn get_place(
    store: web::Data<dyn PlaceStore>,
    path: web::Path<i64>,
) -> Result<impl Responder, PlacesError> {
    let place = PlaceService::get_place_detail(store.get_ref(), path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::new(ResponseCode::PlaceDetail, place)))
}

/// Malformed query strings and path segments answer with the standard error body
fn extractor_configs() -> (web::QueryConfig, web::PathConfig) {
    let query = web::QueryConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected query string: {}", err);
        PlacesError::InvalidInput(err.to_string()).into()
    });
    let path = web::PathConfig::default().error_handler(|err, _req| {
        log::warn!("Rejected path: {}", err);
        PlacesError::InvalidInput(err.to_string()).into()
    });
    (query, path)
}

/// Configuration for place routes
pub fn config(cfg: &mut web::ServiceConfig) {
    let (query_config, path_config) = extractor_configs();

    cfg.service(
        web::scope("/v1")
            .app_data(query_config)
            .app_data(path_config)
            .route("/search", web::get().to(search_places))
            .route("/places/new", web::get().to(new_places))
            .route("/places/{id}", web::get().to(get_place)),
    );
}
