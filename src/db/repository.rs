// src/db/repository.rs
// DOCUMENTATION: Database access layer - all place SQL queries
// PURPOSE: Abstract database operations from business logic

use crate::db::{PlaceImageRepository, PlaceStore, PlaceUnitOfWork, WishlistRepository};
use crate::errors::PlacesError;
use crate::models::{Category, Place, PlaceFilter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgConnection, PgPool, Postgres, Transaction};
use std::collections::HashMap;

const PLACE_COLUMNS: &str = r#"
    id, name, address, category, feature, description, phone,
    latitude, longitude, created_at, updated_at
"#;

/// Internal struct for mapping database rows to Place struct
/// DOCUMENTATION: category is stored as TEXT and parsed into Category here
#[derive(Debug, FromRow)]
struct PlaceRow {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub category: String,
    pub feature: Option<String>,
    pub description: Option<String>,
    pub phone: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlaceRow {
    /// Convert PlaceRow to Place model
    fn to_place(self) -> Result<Place, PlacesError> {
        let category: Category = self.category.parse().map_err(|e: String| {
            log::error!("Place {} has an invalid category: {}", self.id, e);
            PlacesError::DatabaseError(e)
        })?;

        Ok(Place {
            id: self.id,
            name: self.name,
            address: self.address,
            category,
            feature: self.feature,
            description: self.description,
            phone: self.phone,
            latitude: self.latitude,
            longitude: self.longitude,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn to_places(rows: Vec<PlaceRow>) -> Result<Vec<Place>, PlacesError> {
    rows.into_iter().map(PlaceRow::to_place).collect()
}

/// Escape LIKE wildcards so user input is matched literally
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// PlaceRepository: All SQL for the places table
/// DOCUMENTATION: Reads go through the pool, writes through a transaction connection
pub struct PlaceRepository;

impl PlaceRepository {
    /// Search places with optional filters
    /// DOCUMENTATION: Used for GET /v1/search
    /// Filters are ANDed; keyword matches name OR address; feature is a contains match
    pub async fn search(pool: &PgPool, filter: &PlaceFilter) -> Result<Vec<Place>, PlacesError> {
        let sql = format!(
            r#"
            SELECT {}
            FROM places
            WHERE ($1::text IS NULL OR category = $1)
              AND ($2::text IS NULL OR feature ILIKE '%' || $2 || '%' ESCAPE '\')
              AND ($3::text IS NULL
                   OR name ILIKE '%' || $3 || '%' ESCAPE '\'
                   OR address ILIKE '%' || $3 || '%' ESCAPE '\')
            ORDER BY id ASC
            "#,
            PLACE_COLUMNS
        );

        log::debug!("Executing place search: {:?}", filter);

        let rows = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(filter.category.map(|c| c.as_str()))
            .bind(filter.feature.as_deref().map(escape_like))
            .bind(filter.keyword.as_deref().map(escape_like))
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Search query error: {}", e);
                PlacesError::DatabaseError(e.to_string())
            })?;

        to_places(rows)
    }

    /// Retrieve place by ID
    /// DOCUMENTATION: Used for GET /v1/places/{id}
    pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Place>, PlacesError> {
        let sql = format!("SELECT {} FROM places WHERE id = $1", PLACE_COLUMNS);

        let row = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| {
                log::error!("Database error fetching place {}: {}", id, e);
                PlacesError::DatabaseError(e.to_string())
            })?;

        row.map(PlaceRow::to_place).transpose()
    }

    /// Newest places first
    /// DOCUMENTATION: Ties on created_at are broken by id DESC
    pub async fn find_newest(pool: &PgPool, limit: i64) -> Result<Vec<Place>, PlacesError> {
        let sql = format!(
            "SELECT {} FROM places ORDER BY created_at DESC, id DESC LIMIT $1",
            PLACE_COLUMNS
        );

        let rows = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(limit)
            .fetch_all(pool)
            .await
            .map_err(|e| {
                log::error!("Newest places query error: {}", e);
                PlacesError::DatabaseError(e.to_string())
            })?;

        to_places(rows)
    }

    /// Load a place and hold a row lock until the transaction ends
    pub async fn lock_by_id(conn: &mut PgConnection, id: i64) -> Result<Option<Place>, PlacesError> {
        let sql = format!("SELECT {} FROM places WHERE id = $1 FOR UPDATE", PLACE_COLUMNS);

        let row = sqlx::query_as::<_, PlaceRow>(&sql)
            .bind(id)
            .fetch_optional(conn)
            .await
            .map_err(|e| {
                log::error!("Failed to lock place {}: {}", id, e);
                PlacesError::DatabaseError(e.to_string())
            })?;

        row.map(PlaceRow::to_place).transpose()
    }

    /// Hard delete; image rows follow through ON DELETE CASCADE
    pub async fn delete(conn: &mut PgConnection, id: i64) -> Result<(), PlacesError> {
        let rows = sqlx::query("DELETE FROM places WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await
            .map_err(|e| {
                log::error!("Delete failed for place {}: {}", id, e);
                PlacesError::DatabaseError(e.to_string())
            })?
            .rows_affected();

        if rows == 0 {
            return Err(PlacesError::NotFound(id.to_string()));
        }

        Ok(())
    }
}

/// PostgreSQL implementation of the place store
#[derive(Clone)]
pub struct PgPlaceStore {
    pool: PgPool,
}

impl PgPlaceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaceStore for PgPlaceStore {
    async fn search(&self, filter: &PlaceFilter) -> Result<Vec<Place>, PlacesError> {
        PlaceRepository::search(&self.pool, filter).await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Place>, PlacesError> {
        PlaceRepository::find_by_id(&self.pool, id).await
    }

    async fn find_newest(&self, limit: i64) -> Result<Vec<Place>, PlacesError> {
        PlaceRepository::find_newest(&self.pool, limit).await
    }

    async fn find_image_urls(
        &self,
        place_ids: &[i64],
    ) -> Result<HashMap<i64, Option<String>>, PlacesError> {
        if place_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let images = PlaceImageRepository::find_one_per_place(&self.pool, place_ids).await?;

        Ok(images
            .into_iter()
            .map(|image| (image.place_id, image.image_url))
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn PlaceUnitOfWork>, PlacesError> {
        let tx = self.pool.begin().await.map_err(|e| {
            log::error!("Failed to open transaction: {}", e);
            PlacesError::DatabaseError(e.to_string())
        })?;

        Ok(Box::new(PgUnitOfWork { tx }))
    }
}

/// Transaction-backed unit of work; sqlx rolls back on drop
struct PgUnitOfWork {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl PlaceUnitOfWork for PgUnitOfWork {
    async fn lock_place(&mut self, id: i64) -> Result<Option<Place>, PlacesError> {
        PlaceRepository::lock_by_id(&mut *self.tx, id).await
    }

    async fn remove_place_from_wishlists(&mut self, place_id: i64) -> Result<u64, PlacesError> {
        WishlistRepository::remove_place(&mut *self.tx, place_id).await
    }

    async fn delete_place(&mut self, id: i64) -> Result<(), PlacesError> {
        PlaceRepository::delete(&mut *self.tx, id).await
    }

    async fn commit(self: Box<Self>) -> Result<(), PlacesError> {
        self.tx.commit().await.map_err(|e| {
            log::error!("Commit failed: {}", e);
            PlacesError::DatabaseError(e.to_string())
        })
    }
}
