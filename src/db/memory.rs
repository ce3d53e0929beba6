//! In-memory repositories with the same observable behavior as the MongoDB
//! ones. Every call takes the collection lock separately, so a read followed
//! by a write is no more atomic here than it is against the database.

use std::sync::Arc;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;
use tracing::warn;

use crate::models::{
    booking_model::Booking,
    cinema_model::Cinema,
    hall_model::Hall,
    movie_model::Movie,
    user_model::{UpdateUserParams, User},
};

use super::{
    BookingFilter, BookingRepository, CinemaRepository, HallFilter, HallRepository,
    MovieRepository, Pagination, StoreResult, UserRepository,
};

#[derive(Default)]
pub struct InMemoryBookingRepository {
    bookings: RwLock<Vec<Booking>>,
}

#[async_trait]
impl BookingRepository for InMemoryBookingRepository {
    async fn insert_booking(&self, mut booking: Booking) -> StoreResult<Booking> {
        booking.id.get_or_insert_with(ObjectId::new);
        self.bookings.write().await.push(booking.clone());
        Ok(booking)
    }

    async fn get_booking_by_id(&self, id: ObjectId) -> StoreResult<Option<Booking>> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().find(|b| b.id == Some(id)).cloned())
    }

    async fn list_bookings(
        &self,
        filter: &BookingFilter,
        pagination: Pagination,
    ) -> StoreResult<Vec<Booking>> {
        let bookings = self.bookings.read().await;
        let matching: Vec<Booking> = bookings
            .iter()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        Ok(pagination.apply(&matching))
    }

    async fn count_bookings(&self, filter: &BookingFilter) -> StoreResult<u64> {
        let bookings = self.bookings.read().await;
        Ok(bookings.iter().filter(|b| filter.matches(b)).count() as u64)
    }

    async fn mark_canceled(&self, id: ObjectId) -> StoreResult<bool> {
        let mut bookings = self.bookings.write().await;
        match bookings.iter_mut().find(|b| b.id == Some(id)) {
            Some(booking) if !booking.canceled => {
                booking.canceled = true;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

pub struct InMemoryHallRepository {
    halls: RwLock<Vec<Hall>>,
    cinemas: Arc<dyn CinemaRepository>,
}

impl InMemoryHallRepository {
    pub fn new(cinemas: Arc<dyn CinemaRepository>) -> Self {
        InMemoryHallRepository {
            halls: RwLock::new(Vec::new()),
            cinemas,
        }
    }
}

#[async_trait]
impl HallRepository for InMemoryHallRepository {
    async fn insert_hall(&self, mut hall: Hall) -> StoreResult<Hall> {
        let id = *hall.id.get_or_insert_with(ObjectId::new);
        self.halls.write().await.push(hall.clone());

        if !self.cinemas.add_hall(hall.cinema_id, id).await? {
            warn!(hall = %id, cinema = %hall.cinema_id, "Hall inserted for unknown cinema");
        }

        Ok(hall)
    }

    async fn get_hall_by_id(&self, id: ObjectId) -> StoreResult<Option<Hall>> {
        let halls = self.halls.read().await;
        Ok(halls.iter().find(|h| h.id == Some(id)).cloned())
    }

    async fn list_halls(&self, filter: &HallFilter) -> StoreResult<Vec<Hall>> {
        let halls = self.halls.read().await;
        Ok(halls.iter().filter(|h| filter.matches(h)).cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryCinemaRepository {
    cinemas: RwLock<Vec<Cinema>>,
}

#[async_trait]
impl CinemaRepository for InMemoryCinemaRepository {
    async fn insert_cinema(&self, mut cinema: Cinema) -> StoreResult<Cinema> {
        cinema.id.get_or_insert_with(ObjectId::new);
        self.cinemas.write().await.push(cinema.clone());
        Ok(cinema)
    }

    async fn get_cinema_by_id(&self, id: ObjectId) -> StoreResult<Option<Cinema>> {
        let cinemas = self.cinemas.read().await;
        Ok(cinemas.iter().find(|c| c.id == Some(id)).cloned())
    }

    async fn list_cinemas(&self, pagination: Pagination) -> StoreResult<Vec<Cinema>> {
        let cinemas = self.cinemas.read().await;
        Ok(pagination.apply(cinemas.as_slice()))
    }

    async fn add_hall(&self, cinema_id: ObjectId, hall_id: ObjectId) -> StoreResult<bool> {
        let mut cinemas = self.cinemas.write().await;
        match cinemas.iter_mut().find(|c| c.id == Some(cinema_id)) {
            Some(cinema) => {
                cinema.halls.push(hall_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[derive(Default)]
pub struct InMemoryMovieRepository {
    movies: RwLock<Vec<Movie>>,
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn insert_movie(&self, mut movie: Movie) -> StoreResult<Movie> {
        movie.id.get_or_insert_with(ObjectId::new);
        self.movies.write().await.push(movie.clone());
        Ok(movie)
    }

    async fn get_movie_by_id(&self, id: ObjectId) -> StoreResult<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|m| m.id == Some(id)).cloned())
    }

    async fn list_movies(&self) -> StoreResult<Vec<Movie>> {
        Ok(self.movies.read().await.clone())
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert_user(&self, mut user: User) -> StoreResult<User> {
        user.id.get_or_insert_with(ObjectId::new);
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn get_user_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == Some(id)).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self, pagination: Pagination) -> StoreResult<Vec<User>> {
        let users = self.users.read().await;
        Ok(pagination.apply(users.as_slice()))
    }

    async fn update_user(&self, id: ObjectId, params: &UpdateUserParams) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == Some(id)) {
            Some(user) => {
                params.apply(user);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_user(&self, id: ObjectId) -> StoreResult<bool> {
        let mut users = self.users.write().await;
        let before = users.len();
        users.retain(|u| u.id != Some(id));
        Ok(users.len() < before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Store;
    use crate::models::booking_model::Session;
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn inserted_hall_is_linked_to_cinema() {
        let store = Store::in_memory();
        let cinema = store
            .cinema
            .insert_cinema(Cinema {
                id: None,
                name: "Babylon".to_string(),
                location: "Berlin".to_string(),
                halls: vec![],
                rating: 4,
            })
            .await
            .unwrap();
        let cinema_id = cinema.id.unwrap();

        let hall = store
            .hall
            .insert_hall(Hall {
                id: None,
                capacity: 100,
                price: 10.0,
                movie_id: ObjectId::new(),
                cinema_id,
            })
            .await
            .unwrap();

        let cinema = store.cinema.get_cinema_by_id(cinema_id).await.unwrap().unwrap();
        assert_eq!(cinema.halls, vec![hall.id.unwrap()]);
        assert_eq!(
            store.hall.get_hall_capacity(hall.id.unwrap()).await.unwrap(),
            Some(100)
        );
        assert_eq!(store.hall.get_hall_capacity(ObjectId::new()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn mark_canceled_flips_once() {
        let repo = InMemoryBookingRepository::default();
        let booking = repo
            .insert_booking(Booking::new(
                ObjectId::new(),
                ObjectId::new(),
                Session::Morning,
                Utc::now() + Duration::days(1),
            ))
            .await
            .unwrap();
        let id = booking.id.unwrap();

        assert!(repo.mark_canceled(id).await.unwrap());
        assert!(!repo.mark_canceled(id).await.unwrap());
        assert!(!repo.mark_canceled(ObjectId::new()).await.unwrap());
        assert!(repo.get_booking_by_id(id).await.unwrap().unwrap().canceled);
    }

    #[tokio::test]
    async fn delete_user_reports_missing() {
        let repo = InMemoryUserRepository::default();
        let user = repo
            .insert_user(User {
                id: None,
                first_name: "John".to_string(),
                last_name: "Doe".to_string(),
                email: "john@doe.com".to_string(),
                encrypted_password: String::new(),
                is_admin: false,
            })
            .await
            .unwrap();

        assert!(repo.delete_user(user.id.unwrap()).await.unwrap());
        assert!(!repo.delete_user(user.id.unwrap()).await.unwrap());
        assert!(repo.get_user_by_email("john@doe.com").await.unwrap().is_none());
    }
}
