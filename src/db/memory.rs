// src/db/memory.rs
// DOCUMENTATION: In-memory PlaceStore used by service and handler tests
// PURPOSE: Same semantics as PgPlaceStore without a running database

use crate::db::{PlaceStore, PlaceUnitOfWork};
use crate::errors::PlacesError;
use crate::models::{usable_image_url, Category, Place, PlaceFilter, PlaceImage};
use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Wishlist row: (member_id, place_id)
pub type WishlistItem = (i64, i64);

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    pub places: BTreeMap<i64, Place>,
    pub images: Vec<PlaceImage>,
    pub wishlist_items: Vec<WishlistItem>,
}

impl MemoryState {
    pub fn with_place(mut self, place: Place) -> Self {
        self.places.insert(place.id, place);
        self
    }

    pub fn with_image(mut self, place_id: i64, image_url: Option<&str>) -> Self {
        let id = self.images.len() as i64 + 1;
        self.images.push(PlaceImage {
            id,
            place_id,
            image_url: image_url.map(str::to_string),
            created_at: Utc::now(),
        });
        self
    }

    pub fn with_wishlist_item(mut self, member_id: i64, place_id: i64) -> Self {
        self.wishlist_items.push((member_id, place_id));
        self
    }

    fn image_url_for(&self, place_id: i64) -> Option<Option<String>> {
        self.images
            .iter()
            .filter(|image| image.place_id == place_id)
            .min_by_key(|image| (usable_image_url(image.image_url.as_deref()).is_none(), image.id))
            .map(|image| image.image_url.clone())
    }
}

/// Filter evaluation matching the SQL in PlaceRepository::search
pub fn filter_matches(filter: &PlaceFilter, place: &Place) -> bool {
    fn contains(haystack: Option<&str>, needle: &str) -> bool {
        haystack
            .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
            .unwrap_or(false)
    }

    let category_ok = filter.category.map_or(true, |c| place.category == c);
    let feature_ok = filter
        .feature
        .as_deref()
        .map_or(true, |f| contains(place.feature.as_deref(), f));
    let keyword_ok = filter.keyword.as_deref().map_or(true, |k| {
        contains(Some(&place.name), k) || contains(place.address.as_deref(), k)
    });

    category_ok && feature_ok && keyword_ok
}

/// Registration time helper: 2024-05-01 plus `minutes`
pub fn registered_at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(minutes)
}

/// Place fixture
pub fn sample_place(
    id: i64,
    name: &str,
    address: Option<&str>,
    category: Category,
    feature: Option<&str>,
    created_at: DateTime<Utc>,
) -> Place {
    Place {
        id,
        name: name.to_string(),
        address: address.map(str::to_string),
        category,
        feature: feature.map(str::to_string),
        description: None,
        phone: None,
        latitude: None,
        longitude: None,
        created_at,
        updated_at: created_at,
    }
}

pub struct MemoryPlaceStore {
    state: Arc<Mutex<MemoryState>>,
    reads: AtomicUsize,
    fail_place_delete: Arc<AtomicBool>,
}

impl MemoryPlaceStore {
    pub fn new(state: MemoryState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
            reads: AtomicUsize::new(0),
            fail_place_delete: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Number of read queries served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Make the place delete step fail, after the wishlist step has run
    pub fn fail_place_delete(&self) {
        self.fail_place_delete.store(true, Ordering::SeqCst);
    }

    pub async fn snapshot(&self) -> MemoryState {
        self.state.lock().await.clone()
    }

    fn count_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl PlaceStore for MemoryPlaceStore {
    async fn search(&self, filter: &PlaceFilter) -> Result<Vec<Place>, PlacesError> {
        self.count_read();
        let state = self.state.lock().await;
        Ok(state
            .places
            .values()
            .filter(|place| filter_matches(filter, place))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Place>, PlacesError> {
        self.count_read();
        Ok(self.state.lock().await.places.get(&id).cloned())
    }

    async fn find_newest(&self, limit: i64) -> Result<Vec<Place>, PlacesError> {
        self.count_read();
        let state = self.state.lock().await;
        let mut places: Vec<Place> = state.places.values().cloned().collect();
        places.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        places.truncate(limit.max(0) as usize);
        Ok(places)
    }

    async fn find_image_urls(
        &self,
        place_ids: &[i64],
    ) -> Result<HashMap<i64, Option<String>>, PlacesError> {
        self.count_read();
        let state = self.state.lock().await;
        Ok(place_ids
            .iter()
            .filter_map(|id| state.image_url_for(*id).map(|url| (*id, url)))
            .collect())
    }

    async fn begin(&self) -> Result<Box<dyn PlaceUnitOfWork>, PlacesError> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnitOfWork {
            guard,
            staged,
            fail_place_delete: self.fail_place_delete.clone(),
        }))
    }
}

/// Holds the store lock for its whole lifetime; staged changes land on commit only
struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    fail_place_delete: Arc<AtomicBool>,
}

#[async_trait]
impl PlaceUnitOfWork for MemoryUnitOfWork {
    async fn lock_place(&mut self, id: i64) -> Result<Option<Place>, PlacesError> {
        Ok(self.staged.places.get(&id).cloned())
    }

    async fn remove_place_from_wishlists(&mut self, place_id: i64) -> Result<u64, PlacesError> {
        let before = self.staged.wishlist_items.len();
        self.staged
            .wishlist_items
            .retain(|(_, referenced)| *referenced != place_id);
        Ok((before - self.staged.wishlist_items.len()) as u64)
    }

    async fn delete_place(&mut self, id: i64) -> Result<(), PlacesError> {
        if self.fail_place_delete.load(Ordering::SeqCst) {
            return Err(PlacesError::DatabaseError("simulated delete failure".into()));
        }

        // wishlist_items.place_id has no ON DELETE CASCADE
        if self.staged.wishlist_items.iter().any(|(_, p)| *p == id) {
            return Err(PlacesError::DatabaseError(format!(
                "place {} is still referenced by wishlist_items",
                id
            )));
        }

        if self.staged.places.remove(&id).is_none() {
            return Err(PlacesError::NotFound(id.to_string()));
        }
        self.staged.images.retain(|image| image.place_id != id);
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), PlacesError> {
        let MemoryUnitOfWork {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryPlaceStore {
        MemoryPlaceStore::new(
            MemoryState::default()
                .with_place(sample_place(1, "Paws", None, Category::Cafe, None, registered_at(0)))
                .with_wishlist_item(100, 1),
        )
    }

    #[tokio::test]
    async fn test_dropped_unit_of_work_discards_changes() {
        let store = store();

        {
            let mut uow = store.begin().await.unwrap();
            assert_eq!(uow.remove_place_from_wishlists(1).await.unwrap(), 1);
            uow.delete_place(1).await.unwrap();
        }

        let state = store.snapshot().await;
        assert!(state.places.contains_key(&1));
        assert_eq!(state.wishlist_items.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_before_wishlist_cleanup_is_rejected() {
        let store = store();
        let mut uow = store.begin().await.unwrap();

        let result = uow.delete_place(1).await;
        assert!(matches!(result, Err(PlacesError::DatabaseError(_))));
    }

    #[test]
    fn test_filter_matches_is_conjunctive() {
        let cafe = sample_place(
            1,
            "Paws",
            Some("서울 강남구 테헤란로 1"),
            Category::Cafe,
            Some("Large dogs, Terrace"),
            registered_at(0),
        );
        let filter = PlaceFilter {
            category: Some(Category::Cafe),
            feature: Some("terrace".into()),
            keyword: Some("강남".into()),
        };

        assert!(filter_matches(&PlaceFilter::default(), &cafe));
        assert!(filter_matches(&filter, &cafe));

        let park = Place {
            category: Category::Park,
            ..cafe.clone()
        };
        assert!(!filter_matches(&filter, &park));

        let elsewhere = Place {
            address: Some("서울 마포구".into()),
            ..cafe
        };
        assert!(!filter_matches(&filter, &elsewhere));
    }

    #[tokio::test]
    async fn test_image_preference() {
        let store = MemoryPlaceStore::new(
            MemoryState::default()
                .with_image(1, Some(""))
                .with_image(1, Some("https://cdn.ulpet.kr/1-b.jpg"))
                .with_image(1, Some("https://cdn.ulpet.kr/1-c.jpg"))
                .with_image(2, None),
        );

        let urls = store.find_image_urls(&[1, 2, 3]).await.unwrap();

        assert_eq!(
            urls.get(&1),
            Some(&Some("https://cdn.ulpet.kr/1-b.jpg".to_string()))
        );
        assert_eq!(urls.get(&2), Some(&None));
        assert!(!urls.contains_key(&3));
    }
}
