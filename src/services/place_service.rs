// src/services/place_service.rs
// DOCUMENTATION: Business logic for places
// PURPOSE: Intermediary between handlers and the place store

use crate::db::PlaceStore;
use crate::errors::PlacesError;
use crate::models::{usable_image_url, DeletedPlace, Place, PlaceResponse, SearchQuery};
use std::collections::HashMap;

pub struct PlaceService;

impl PlaceService {
    /// Search places by category, feature and keyword
    /// DOCUMENTATION: All supplied filters must hold; the keyword matches name or address.
    /// Every result carries its representative image URL.
    pub async fn search_places(
        store: &dyn PlaceStore,
        query: SearchQuery,
    ) -> Result<Vec<PlaceResponse>, PlacesError> {
        let filter = query.into_filter();
        let places = store.search(&filter).await?;

        log::info!("Place search {:?}: {} results", filter, places.len());

        Self::with_images(store, places).await
    }

    /// Image URL of one place, None when missing, NULL or empty
    pub async fn resolve_image_url(
        store: &dyn PlaceStore,
        place_id: i64,
    ) -> Result<Option<String>, PlacesError> {
        let mut urls = store.find_image_urls(&[place_id]).await?;
        let url = urls.remove(&place_id).and_then(Self::normalize_image_url);

        log::debug!("Image for place {}: {:?}", place_id, url);
        Ok(url)
    }

    /// Get a place by ID
    pub async fn get_place_detail(
        store: &dyn PlaceStore,
        place_id: i64,
    ) -> Result<PlaceResponse, PlacesError> {
        let place = store.find_by_id(place_id).await?.ok_or_else(|| {
            log::warn!("Place not found: {}", place_id);
            PlacesError::NotFound(place_id.to_string())
        })?;

        let image_url = Self::resolve_image_url(store, place_id).await?;
        Ok(place.to_response(image_url))
    }

    /// Most recently registered places
    /// DOCUMENTATION: Newest first, ties broken by id DESC. A non-positive
    /// limit yields an empty list without querying the store.
    pub async fn new_register_places(
        store: &dyn PlaceStore,
        limit: i64,
    ) -> Result<Vec<PlaceResponse>, PlacesError> {
        if limit <= 0 {
            return Ok(Vec::new());
        }

        let places = store.find_newest(limit).await?;
        log::info!("Newest places (limit {}): {} results", limit, places.len());

        Self::with_images(store, places).await
    }

    /// Delete a place and remove it from every wishlist
    /// DOCUMENTATION: Both steps run in one unit of work. Returning early with `?`
    /// drops the unit of work, which rolls back whatever was already applied.
    pub async fn delete_place(
        store: &dyn PlaceStore,
        place_id: i64,
    ) -> Result<DeletedPlace, PlacesError> {
        let mut uow = store.begin().await?;

        if uow.lock_place(place_id).await?.is_none() {
            log::warn!("Delete requested for unknown place: {}", place_id);
            return Err(PlacesError::NotFound(place_id.to_string()));
        }

        let removed_wishlist_items = uow.remove_place_from_wishlists(place_id).await?;
        uow.delete_place(place_id).await?;
        uow.commit().await?;

        log::info!(
            "Deleted place {} (removed from {} wishlists)",
            place_id,
            removed_wishlist_items
        );

        Ok(DeletedPlace {
            place_id,
            removed_wishlist_items,
        })
    }

    /// Attach image URLs with one batched lookup, keeping the store's order
    async fn with_images(
        store: &dyn PlaceStore,
        places: Vec<Place>,
    ) -> Result<Vec<PlaceResponse>, PlacesError> {
        if places.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = places.iter().map(|p| p.id).collect();
        let mut urls: HashMap<i64, Option<String>> = store.find_image_urls(&ids).await?;

        Ok(places
            .iter()
            .map(|place| {
                let url = urls.remove(&place.id).and_then(Self::normalize_image_url);
                place.to_response(url)
            })
            .collect())
    }

    fn normalize_image_url(url: Option<String>) -> Option<String> {
        usable_image_url(url.as_deref()).map(str::to_string)
    }
}
