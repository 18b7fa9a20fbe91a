use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::geo::distance_km;
use crate::models::{
    Booking, BookingStatus, GeoPoint, Message, Review, Role, Service, ServiceCategory, User,
};

use super::{
    BookingPatch, CategoryPatch, NewBooking, NewCategory, NewMessage, NewReview, NewService,
    NewUser, ServicePatch, Store, StoreResult, UserPatch,
};

/// Categories every fresh store starts with.
const SEED_CATEGORIES: &[(&str, &str, &str)] = &[
    ("Translation", "language", "Interpreters and translators for any language pair"),
    ("Driving", "car", "Personal drivers and chauffeurs"),
    ("Cooking", "chef-hat", "Private chefs for events and daily meals"),
    ("Tour Guide", "map", "Local guides for sightseeing and trips"),
    ("Security", "shield", "Personal security and bodyguard services"),
    ("Childcare", "baby", "Babysitters and nannies"),
];

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    categories: BTreeMap<i64, ServiceCategory>,
    services: BTreeMap<i64, Service>,
    bookings: BTreeMap<i64, Booking>,
    reviews: BTreeMap<i64, Review>,
    messages: BTreeMap<i64, Message>,
    next_user_id: i64,
    next_category_id: i64,
    next_service_id: i64,
    next_booking_id: i64,
    next_review_id: i64,
    next_message_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// In-memory backend. One lock over all tables keeps every operation
/// single-writer and makes the review insert-then-recompute step atomic for
/// other callers.
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut tables = Tables::default();
        for (name, icon, description) in SEED_CATEGORIES {
            let id = Tables::next_id(&mut tables.next_category_id);
            tables.categories.insert(
                id,
                ServiceCategory {
                    id,
                    name: (*name).to_string(),
                    icon: (*icon).to_string(),
                    description: Some((*description).to_string()),
                },
            );
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let mut t = self.tables.write().await;
        let id = Tables::next_id(&mut t.next_user_id);
        let now = Utc::now();
        let user = User {
            id,
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            full_name: new.full_name,
            role: new.role,
            languages: new.languages,
            bio: new.bio,
            is_verified: false,
            avg_rating: None,
            location: new.location,
            created_at: now,
            last_active: now,
        };
        t.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn list_users(&self) -> StoreResult<Vec<User>> {
        Ok(self.tables.read().await.users.values().cloned().collect())
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users
            .values()
            .find(|u| u.username.eq_ignore_ascii_case(username))
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let t = self.tables.read().await;
        Ok(t.users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> StoreResult<Option<User>> {
        let mut t = self.tables.write().await;
        let Some(user) = t.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password_hash) = patch.password_hash {
            user.password_hash = password_hash;
        }
        if let Some(full_name) = patch.full_name {
            user.full_name = full_name;
        }
        if let Some(languages) = patch.languages {
            user.languages = Some(languages);
        }
        if let Some(bio) = patch.bio {
            user.bio = Some(bio);
        }
        if let Some(is_verified) = patch.is_verified {
            user.is_verified = is_verified;
        }
        if let Some(location) = patch.location {
            user.location = Some(location);
        }
        // "Last touched" signal: refreshed on every update, related or not.
        user.last_active = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn nearby_assistants(
        &self,
        center: GeoPoint,
        radius_km: f64,
    ) -> StoreResult<Vec<(User, f64)>> {
        let t = self.tables.read().await;
        let mut hits: Vec<(User, f64)> = t
            .users
            .values()
            .filter(|u| u.role == Role::Assistant)
            .filter_map(|u| {
                let loc = u.location?;
                let d = distance_km(center.lat, center.lng, loc.lat, loc.lng);
                (d <= radius_km).then(|| (u.clone(), d))
            })
            .collect();
        // Distance computed once per candidate; stable sort keeps insertion
        // order on ties.
        hits.sort_by(|a, b| a.1.total_cmp(&b.1));
        Ok(hits)
    }

    async fn create_category(&self, new: NewCategory) -> StoreResult<ServiceCategory> {
        let mut t = self.tables.write().await;
        let id = Tables::next_id(&mut t.next_category_id);
        let category = ServiceCategory {
            id,
            name: new.name,
            icon: new.icon,
            description: new.description,
        };
        t.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn get_category(&self, id: i64) -> StoreResult<Option<ServiceCategory>> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn list_categories(&self) -> StoreResult<Vec<ServiceCategory>> {
        Ok(self
            .tables
            .read()
            .await
            .categories
            .values()
            .cloned()
            .collect())
    }

    async fn find_category_by_name(&self, name: &str) -> StoreResult<Option<ServiceCategory>> {
        let t = self.tables.read().await;
        Ok(t.categories
            .values()
            .find(|c| c.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    async fn update_category(
        &self,
        id: i64,
        patch: CategoryPatch,
    ) -> StoreResult<Option<ServiceCategory>> {
        let mut t = self.tables.write().await;
        let Some(category) = t.categories.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(icon) = patch.icon {
            category.icon = icon;
        }
        if let Some(description) = patch.description {
            category.description = Some(description);
        }
        Ok(Some(category.clone()))
    }

    async fn delete_category(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.categories.remove(&id).is_some())
    }

    async fn create_service(&self, new: NewService) -> StoreResult<Service> {
        let mut t = self.tables.write().await;
        let id = Tables::next_id(&mut t.next_service_id);
        let service = Service {
            id,
            assistant_id: new.assistant_id,
            category_id: new.category_id,
            hourly_rate: new.hourly_rate,
            description: new.description,
        };
        t.services.insert(id, service.clone());
        Ok(service)
    }

    async fn get_service(&self, id: i64) -> StoreResult<Option<Service>> {
        Ok(self.tables.read().await.services.get(&id).cloned())
    }

    async fn list_services(&self) -> StoreResult<Vec<Service>> {
        Ok(self.tables.read().await.services.values().cloned().collect())
    }

    async fn list_services_by_assistant(&self, assistant_id: i64) -> StoreResult<Vec<Service>> {
        let t = self.tables.read().await;
        Ok(t.services
            .values()
            .filter(|s| s.assistant_id == assistant_id)
            .cloned()
            .collect())
    }

    async fn list_services_by_category(&self, category_id: i64) -> StoreResult<Vec<Service>> {
        let t = self.tables.read().await;
        Ok(t.services
            .values()
            .filter(|s| s.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn update_service(&self, id: i64, patch: ServicePatch) -> StoreResult<Option<Service>> {
        let mut t = self.tables.write().await;
        let Some(service) = t.services.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(category_id) = patch.category_id {
            service.category_id = category_id;
        }
        if let Some(hourly_rate) = patch.hourly_rate {
            service.hourly_rate = hourly_rate;
        }
        if let Some(description) = patch.description {
            service.description = Some(description);
        }
        Ok(Some(service.clone()))
    }

    async fn delete_service(&self, id: i64) -> StoreResult<bool> {
        Ok(self.tables.write().await.services.remove(&id).is_some())
    }

    async fn create_booking(&self, new: NewBooking) -> StoreResult<Booking> {
        let mut t = self.tables.write().await;
        let id = Tables::next_id(&mut t.next_booking_id);
        let booking = Booking {
            id,
            client_id: new.client_id,
            assistant_id: new.assistant_id,
            service_id: new.service_id,
            start_time: new.start_time,
            end_time: new.end_time,
            location: new.location,
            status: BookingStatus::Pending,
            total_amount: new.total_amount,
            notes: new.notes,
            created_at: Utc::now(),
        };
        t.bookings.insert(id, booking.clone());
        Ok(booking)
    }

    async fn get_booking(&self, id: i64) -> StoreResult<Option<Booking>> {
        Ok(self.tables.read().await.bookings.get(&id).cloned())
    }

    async fn list_bookings(&self) -> StoreResult<Vec<Booking>> {
        Ok(self.tables.read().await.bookings.values().cloned().collect())
    }

    async fn list_bookings_for_user(&self, user_id: i64) -> StoreResult<Vec<Booking>> {
        let t = self.tables.read().await;
        Ok(t.bookings
            .values()
            .filter(|b| b.client_id == user_id || b.assistant_id == user_id)
            .cloned()
            .collect())
    }

    async fn update_booking(&self, id: i64, patch: BookingPatch) -> StoreResult<Option<Booking>> {
        let mut t = self.tables.write().await;
        let Some(booking) = t.bookings.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(status) = patch.status {
            booking.status = status;
        }
        if let Some(notes) = patch.notes {
            booking.notes = Some(notes);
        }
        Ok(Some(booking.clone()))
    }

    async fn create_review(&self, new: NewReview) -> StoreResult<Review> {
        let mut t = self.tables.write().await;
        let id = Tables::next_id(&mut t.next_review_id);
        let review = Review {
            id,
            booking_id: new.booking_id,
            client_id: new.client_id,
            assistant_id: new.assistant_id,
            rating: new.rating,
            comment: new.comment,
            created_at: Utc::now(),
        };
        t.reviews.insert(id, review.clone());

        // Eager recomputation over the full review set, not incremental.
        let (sum, count) = t
            .reviews
            .values()
            .filter(|r| r.assistant_id == new.assistant_id)
            .fold((0i64, 0i64), |(sum, count), r| {
                (sum + i64::from(r.rating), count + 1)
            });
        if let Some(assistant) = t.users.get_mut(&new.assistant_id) {
            assistant.avg_rating = Some(sum as f64 / count as f64);
        }

        Ok(review)
    }

    async fn list_reviews_by_assistant(&self, assistant_id: i64) -> StoreResult<Vec<Review>> {
        let t = self.tables.read().await;
        Ok(t.reviews
            .values()
            .filter(|r| r.assistant_id == assistant_id)
            .cloned()
            .collect())
    }

    async fn create_message(&self, new: NewMessage) -> StoreResult<Message> {
        let mut t = self.tables.write().await;
        let id = Tables::next_id(&mut t.next_message_id);
        let message = Message {
            id,
            sender_id: new.sender_id,
            receiver_id: new.receiver_id,
            content: new.content,
            created_at: Utc::now(),
            is_read: false,
        };
        t.messages.insert(id, message.clone());
        Ok(message)
    }

    async fn get_message(&self, id: i64) -> StoreResult<Option<Message>> {
        Ok(self.tables.read().await.messages.get(&id).cloned())
    }

    async fn get_conversation(&self, a: i64, b: i64) -> StoreResult<Vec<Message>> {
        let t = self.tables.read().await;
        let mut msgs: Vec<Message> = t
            .messages
            .values()
            .filter(|m| {
                (m.sender_id == a && m.receiver_id == b)
                    || (m.sender_id == b && m.receiver_id == a)
            })
            .cloned()
            .collect();
        msgs.sort_by_key(|m| m.created_at);
        Ok(msgs)
    }

    async fn mark_message_read(&self, id: i64) -> StoreResult<Option<Message>> {
        let mut t = self.tables.write().await;
        let Some(message) = t.messages.get_mut(&id) else {
            return Ok(None);
        };
        message.is_read = true;
        Ok(Some(message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str, role: Role, location: Option<GeoPoint>) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{name}@example.com"),
            password_hash: "hash".to_string(),
            full_name: name.to_string(),
            role,
            languages: None,
            bio: None,
            location,
        }
    }

    #[tokio::test]
    async fn ids_are_unique_and_increasing() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let mut last = 0;
        for i in 0..5 {
            let user = store
                .create_user(new_user(&format!("u{i}"), Role::Client, None))
                .await?;
            assert!(user.id > last);
            last = user.id;
        }
        Ok(())
    }

    #[tokio::test]
    async fn seeded_categories_present() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let categories = store.list_categories().await?;
        assert_eq!(categories.len(), 6);
        assert!(store.find_category_by_name("childcare").await?.is_some());
        Ok(())
    }

    #[tokio::test]
    async fn username_and_email_lookup_ignore_case() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        store
            .create_user(new_user("Alice", Role::Client, None))
            .await?;
        assert!(store.find_user_by_username("aLiCe").await?.is_some());
        assert!(store.find_user_by_email("ALICE@EXAMPLE.COM").await?.is_some());
        assert!(store.find_user_by_username("bob").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn update_user_merges_and_refreshes_last_active() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let user = store
            .create_user(new_user("alice", Role::Client, None))
            .await?;
        let before = user.last_active;

        let updated = store
            .update_user(
                user.id,
                UserPatch {
                    bio: Some("polyglot".to_string()),
                    ..Default::default()
                },
            )
            .await?
            .expect("user exists");

        assert_eq!(updated.bio.as_deref(), Some("polyglot"));
        assert_eq!(updated.full_name, "alice");
        assert!(updated.last_active >= before);

        // An empty patch still touches last_active.
        let touched = store
            .update_user(user.id, UserPatch::default())
            .await?
            .expect("user exists");
        assert!(touched.last_active >= updated.last_active);

        assert!(store.update_user(999, UserPatch::default()).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn nearby_assistants_filters_and_sorts() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let center = GeoPoint { lat: 48.8566, lng: 2.3522 };

        // ~7.5 km north of center.
        let far = store
            .create_user(new_user(
                "far",
                Role::Assistant,
                Some(GeoPoint { lat: 48.924, lng: 2.3522 }),
            ))
            .await?;
        // At the center.
        let near = store
            .create_user(new_user("near", Role::Assistant, Some(center)))
            .await?;
        // Outside the radius.
        store
            .create_user(new_user(
                "away",
                Role::Assistant,
                Some(GeoPoint { lat: 49.5, lng: 2.3522 }),
            ))
            .await?;
        // Wrong role, right place.
        store
            .create_user(new_user("client", Role::Client, Some(center)))
            .await?;
        // No location.
        store
            .create_user(new_user("nowhere", Role::Assistant, None))
            .await?;

        let hits = store.nearby_assistants(center, 10.0).await?;
        let ids: Vec<i64> = hits.iter().map(|(u, _)| u.id).collect();
        assert_eq!(ids, vec![near.id, far.id]);
        for (_, d) in &hits {
            assert!(*d <= 10.0);
        }
        assert!(hits[0].1 <= hits[1].1);
        Ok(())
    }

    #[tokio::test]
    async fn review_creation_recomputes_mean() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let assistant = store
            .create_user(new_user("helper", Role::Assistant, None))
            .await?;
        let client = store
            .create_user(new_user("client", Role::Client, None))
            .await?;

        for (booking_id, rating) in [(1, 4), (2, 2)] {
            store
                .create_review(NewReview {
                    booking_id,
                    client_id: client.id,
                    assistant_id: assistant.id,
                    rating,
                    comment: None,
                })
                .await?;
        }

        let user = store.get_user(assistant.id).await?.expect("assistant");
        assert_eq!(user.avg_rating, Some(3.0));

        // (m*n + r) / (n+1) = (3*2 + 5) / 3
        store
            .create_review(NewReview {
                booking_id: 3,
                client_id: client.id,
                assistant_id: assistant.id,
                rating: 5,
                comment: None,
            })
            .await?;
        let user = store.get_user(assistant.id).await?.expect("assistant");
        assert_eq!(user.avg_rating, Some(11.0 / 3.0));
        Ok(())
    }

    #[tokio::test]
    async fn conversation_is_bidirectional_ordered_and_private() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let a = store.create_user(new_user("a", Role::Client, None)).await?;
        let b = store
            .create_user(new_user("b", Role::Assistant, None))
            .await?;
        let c = store.create_user(new_user("c", Role::Client, None)).await?;

        store
            .create_message(NewMessage {
                sender_id: a.id,
                receiver_id: b.id,
                content: "hi".to_string(),
            })
            .await?;
        store
            .create_message(NewMessage {
                sender_id: b.id,
                receiver_id: a.id,
                content: "hello".to_string(),
            })
            .await?;
        store
            .create_message(NewMessage {
                sender_id: c.id,
                receiver_id: a.id,
                content: "psst".to_string(),
            })
            .await?;

        let convo = store.get_conversation(a.id, b.id).await?;
        let contents: Vec<&str> = convo.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["hi", "hello"]);
        assert!(convo.windows(2).all(|w| w[0].created_at <= w[1].created_at));

        let read = store
            .mark_message_read(convo[0].id)
            .await?
            .expect("message exists");
        assert!(read.is_read);
        Ok(())
    }

    #[tokio::test]
    async fn delete_reports_existence() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        let service = store
            .create_service(NewService {
                assistant_id: 1,
                category_id: 1,
                hourly_rate: 20.0,
                description: None,
            })
            .await?;
        assert!(store.delete_service(service.id).await?);
        assert!(!store.delete_service(service.id).await?);
        assert!(store.get_service(service.id).await?.is_none());
        Ok(())
    }
}
