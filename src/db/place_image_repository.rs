// src/db/place_image_repository.rs
// DOCUMENTATION: Place image database operations
// PURPOSE: Resolve the representative image of each place

use crate::errors::PlacesError;
use crate::models::PlaceImage;
use sqlx::PgPool;

pub struct PlaceImageRepository;

impl PlaceImageRepository {
    /// One image record per place for a batch of place ids
    /// DOCUMENTATION: Single query instead of one lookup per place.
    /// Records with a usable URL sort first, then the oldest image id wins.
    pub async fn find_one_per_place(
        pool: &PgPool,
        place_ids: &[i64],
    ) -> Result<Vec<PlaceImage>, PlacesError> {
        let images = sqlx::query_as::<_, PlaceImage>(
            r#"
            SELECT DISTINCT ON (place_id) id, place_id, image_url, created_at
            FROM place_images
            WHERE place_id = ANY($1)
            ORDER BY place_id,
                     (image_url IS NULL OR image_url = '') ASC,
                     id ASC
            "#,
        )
        .bind(place_ids)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            log::error!("Failed to fetch images for {} places: {}", place_ids.len(), e);
            PlacesError::DatabaseError(format!("Fetch images failed: {}", e))
        })?;

        Ok(images)
    }
}
