// src/models/place.rs
// DOCUMENTATION: Core data structures for places
// PURPOSE: Defines all serialization/deserialization models for API and database

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Closed set of place classifications
/// DOCUMENTATION: Serialized as SCREAMING_SNAKE_CASE in query strings, JSON and the
/// `places.category` column. Parsing is case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Category {
    Cafe,
    Restaurant,
    Accommodation,
    Park,
    Hospital,
    PetShop,
    Grooming,
    Culture,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Cafe,
        Category::Restaurant,
        Category::Accommodation,
        Category::Park,
        Category::Hospital,
        Category::PetShop,
        Category::Grooming,
        Category::Culture,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Cafe => "CAFE",
            Category::Restaurant => "RESTAURANT",
            Category::Accommodation => "ACCOMMODATION",
            Category::Park => "PARK",
            Category::Hospital => "HOSPITAL",
            Category::PetShop => "PET_SHOP",
            Category::Grooming => "GROOMING",
            Category::Culture => "CULTURE",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown category: {}", s))
    }
}

/// Represents a complete place record from the database
/// DOCUMENTATION: Mirrors the places table; built from `PlaceRow` in the repository
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Place {
    /// Unique identifier (BIGSERIAL)
    pub id: i64,

    /// Place name
    pub name: String,

    /// Street address
    pub address: Option<String>,

    /// Place classification
    pub category: Category,

    /// Free-text pet-related features ("large dogs allowed, terrace", ...)
    pub feature: Option<String>,

    /// Optional detailed description
    pub description: Option<String>,

    /// Phone number
    pub phone: Option<String>,

    /// Geographic coordinates
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    /// Registration time, used by the newest-places listing
    pub created_at: DateTime<Utc>,

    /// When record was last modified
    pub updated_at: DateTime<Utc>,
}

/// Response DTO for API responses
/// DOCUMENTATION: Place projection plus its representative image.
/// `place_image_url` is null when the place has no non-empty image URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceResponse {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub category: Category,
    pub feature: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub place_image_url: Option<String>,
}

impl Place {
    /// Convert Place to PlaceResponse for API
    /// DOCUMENTATION: Maps database model to API response DTO with the resolved image
    pub fn to_response(&self, place_image_url: Option<String>) -> PlaceResponse {
        PlaceResponse {
            id: self.id,
            name: self.name.clone(),
            address: self.address.clone(),
            category: self.category,
            feature: self.feature.clone(),
            description: self.description.clone(),
            phone: self.phone.clone(),
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: self.created_at,
            place_image_url,
        }
    }
}

/// Search query parameters
/// DOCUMENTATION: DTO for parsing query string in /v1/search endpoint
/// All parameters are optional; an unknown category fails query extraction
#[derive(Debug, Default, Deserialize, Validate)]
pub struct SearchQuery {
    /// Filter by category (exact match); `category=` means no filter
    #[serde(default, deserialize_with = "blank_category_as_none")]
    pub category: Option<Category>,

    /// Filter by feature (case-insensitive contains)
    #[validate(length(max = 50))]
    pub feature: Option<String>,

    /// Matched against place name or address
    #[validate(length(max = 100))]
    pub keyword: Option<String>,
}

/// Empty or whitespace-only category parameters count as absent
fn blank_category_as_none<'de, D>(deserializer: D) -> Result<Option<Category>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Normalized search filters handed to the store
/// DOCUMENTATION: Blank strings are already collapsed to None
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaceFilter {
    pub category: Option<Category>,
    pub feature: Option<String>,
    pub keyword: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl SearchQuery {
    pub fn into_filter(self) -> PlaceFilter {
        PlaceFilter {
            category: self.category,
            feature: non_blank(self.feature),
            keyword: non_blank(self.keyword),
        }
    }
}

/// Query parameters for /v1/places/new
#[derive(Debug, Deserialize)]
pub struct NewPlacesQuery {
    pub limit: Option<i64>,
}

/// Outcome of a place deletion
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedPlace {
    pub place_id: i64,
    pub removed_wishlist_items: u64,
}
