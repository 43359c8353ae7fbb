// src/db/wishlist_repository.rs
// DOCUMENTATION: Wishlist cleanup hook
// PURPOSE: Remove wishlist rows that point at a place about to be deleted

use crate::errors::PlacesError;
use sqlx::PgConnection;

pub struct WishlistRepository;

impl WishlistRepository {
    /// Remove a place from every member's wishlist
    /// DOCUMENTATION: Runs on the caller's transaction so it commits or rolls back
    /// together with the place deletion
    pub async fn remove_place(conn: &mut PgConnection, place_id: i64) -> Result<u64, PlacesError> {
        let result = sqlx::query("DELETE FROM wishlist_items WHERE place_id = $1")
            .bind(place_id)
            .execute(conn)
            .await
            .map_err(|e| {
                log::error!("Failed to remove place {} from wishlists: {}", place_id, e);
                PlacesError::DatabaseError(format!("Wishlist cleanup failed: {}", e))
            })?;

        Ok(result.rows_affected())
    }
}
