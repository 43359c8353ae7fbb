// src/models/place_image.rs
// DOCUMENTATION: Place image records
// PURPOSE: Representative image lookup model and the "no image" rule

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Image attached to a place
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlaceImage {
    pub id: i64,
    pub place_id: i64,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Collapse NULL and empty URLs into a single "no image"
pub fn usable_image_url(url: Option<&str>) -> Option<&str> {
    url.filter(|u| !u.is_empty())
}
