//! Sample data for the seed binary and the tests.
//!
//! A fixture user `first last` gets the email `first@last.com` and the
//! password `first_last`.

use anyhow::{anyhow, Result};
use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;

use crate::auth::password::hash_password;
use crate::models::{
    booking_model::{Booking, Session},
    cinema_model::Cinema,
    hall_model::Hall,
    movie_model::{Genre, Movie},
    user_model::User,
};

use super::Store;

pub fn fixture_email(first_name: &str, last_name: &str) -> String {
    format!("{first_name}@{last_name}.com").to_lowercase()
}

pub fn fixture_password(first_name: &str, last_name: &str) -> String {
    format!("{first_name}_{last_name}")
}

pub async fn add_user(store: &Store, first_name: &str, last_name: &str, admin: bool) -> Result<User> {
    let encrypted_password = hash_password(&fixture_password(first_name, last_name))
        .map_err(|e| anyhow!("failed to hash fixture password: {e}"))?;

    let user = store
        .user
        .insert_user(User {
            id: None,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: fixture_email(first_name, last_name),
            encrypted_password,
            is_admin: admin,
        })
        .await?;
    Ok(user)
}

pub async fn add_cinema(store: &Store, name: &str, location: &str, rating: u8) -> Result<Cinema> {
    let cinema = store
        .cinema
        .insert_cinema(Cinema {
            id: None,
            name: name.to_string(),
            location: location.to_string(),
            halls: Vec::new(),
            rating,
        })
        .await?;
    Ok(cinema)
}

pub async fn add_movie(store: &Store, title: &str, genre: Genre) -> Result<Movie> {
    let movie = store
        .movie
        .insert_movie(Movie {
            id: None,
            title: title.to_string(),
            genre,
        })
        .await?;
    Ok(movie)
}

pub async fn add_hall(
    store: &Store,
    capacity: u32,
    price: f64,
    cinema_id: ObjectId,
    movie_id: ObjectId,
) -> Result<Hall> {
    let hall = store
        .hall
        .insert_hall(Hall {
            id: None,
            capacity,
            price,
            movie_id,
            cinema_id,
        })
        .await?;
    Ok(hall)
}

/// Inserts directly, bypassing admission.
pub async fn add_booking(
    store: &Store,
    user_id: ObjectId,
    hall_id: ObjectId,
    session: Session,
    date: DateTime<Utc>,
) -> Result<Booking> {
    let booking = store
        .booking
        .insert_booking(Booking::new(user_id, hall_id, session, date))
        .await?;
    Ok(booking)
}
