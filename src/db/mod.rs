// src/db/mod.rs
// DOCUMENTATION: Database module organization
// PURPOSE: Persistence port used by the services, plus its PostgreSQL adapter

pub mod place_image_repository;
pub mod repository;
pub mod wishlist_repository;

#[cfg(test)]
pub mod memory;

pub use place_image_repository::*;
pub use repository::*;
pub use wishlist_repository::*;

use crate::errors::PlacesError;
use crate::models::{Place, PlaceFilter};
use async_trait::async_trait;
use std::collections::HashMap;

/// Read access to places and their images, plus transactional deletion
/// DOCUMENTATION: Implemented by PgPlaceStore in production and by the
/// in-memory store in tests
#[async_trait]
pub trait PlaceStore: Send + Sync {
    /// Places matching every supplied filter, ascending id
    async fn search(&self, filter: &PlaceFilter) -> Result<Vec<Place>, PlacesError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Place>, PlacesError>;

    /// Most recently registered places: created_at DESC, id DESC
    async fn find_newest(&self, limit: i64) -> Result<Vec<Place>, PlacesError>;

    /// One raw image URL per place id that has an image record.
    /// Records with a non-empty URL are preferred, then the lowest image id.
    async fn find_image_urls(
        &self,
        place_ids: &[i64],
    ) -> Result<HashMap<i64, Option<String>>, PlacesError>;

    /// Open a unit of work; dropping it without commit rolls everything back
    async fn begin(&self) -> Result<Box<dyn PlaceUnitOfWork>, PlacesError>;
}

/// Writes that must commit or roll back together
#[async_trait]
pub trait PlaceUnitOfWork: Send {
    /// Load and lock a place for the rest of the unit of work
    async fn lock_place(&mut self, id: i64) -> Result<Option<Place>, PlacesError>;

    /// Remove the place from every wishlist; returns the removed row count
    async fn remove_place_from_wishlists(&mut self, place_id: i64) -> Result<u64, PlacesError>;

    async fn delete_place(&mut self, id: i64) -> Result<(), PlacesError>;

    async fn commit(self: Box<Self>) -> Result<(), PlacesError>;
}
