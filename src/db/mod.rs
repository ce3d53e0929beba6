//! Document store access for users, cinemas, movies, halls and bookings.
//!
//! Each collection is reached through an object-safe repository trait so the
//! HTTP layer and the booking core never see the mongodb driver directly. The
//! MongoDB implementations back the deployed service; the in-memory ones in
//! [`memory`] back the tests.

use std::sync::Arc;

use mongodb::{bson::doc, options::ClientOptions, Client};
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

pub mod booking_store;
pub mod cinema_store;
pub mod filter;
pub mod fixtures;
pub mod hall_store;
pub mod memory;
pub mod movie_store;
pub mod user_store;

pub use booking_store::{BookingRepository, MongoBookingRepository};
pub use cinema_store::{CinemaRepository, MongoCinemaRepository};
pub use filter::{BookingFilter, DateRange, HallFilter};
pub use hall_store::{HallRepository, MongoHallRepository};
pub use movie_store::{MongoMovieRepository, MovieRepository};
pub use user_store::{MongoUserRepository, UserRepository};

pub const DEFAULT_DB_NAME: &str = "movie-ticket-booking";

const DEFAULT_PAGE: u64 = 1;
const DEFAULT_LIMIT: u64 = 10;
const MAX_LIMIT: u64 = 100;

/// Backing-store fault. Never a business outcome.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("mongodb error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("inserted document has no object id")]
    MissingId,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// One-based page selection shared by the listing routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Pagination {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Default for Pagination {
    fn default() -> Self {
        Pagination {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        Pagination {
            page: page.unwrap_or(DEFAULT_PAGE),
            limit: limit.unwrap_or(DEFAULT_LIMIT),
        }
    }

    pub fn page(&self) -> u64 {
        self.page.max(1)
    }

    pub fn limit(&self) -> u64 {
        self.limit.clamp(1, MAX_LIMIT)
    }

    pub fn skip(&self) -> u64 {
        (self.page() - 1) * self.limit()
    }

    /// Slices an already ordered collection the way the database would.
    pub fn apply<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.skip() as usize)
            .take(self.limit() as usize)
            .cloned()
            .collect()
    }
}

/// Every repository the application uses, injected as trait objects.
#[derive(Clone)]
pub struct Store {
    pub user: Arc<dyn UserRepository>,
    pub cinema: Arc<dyn CinemaRepository>,
    pub movie: Arc<dyn MovieRepository>,
    pub hall: Arc<dyn HallRepository>,
    pub booking: Arc<dyn BookingRepository>,
}

impl Store {
    pub fn mongo(client: &Client, db_name: &str) -> Self {
        let cinema: Arc<dyn CinemaRepository> = Arc::new(MongoCinemaRepository::new(client, db_name));
        Store {
            user: Arc::new(MongoUserRepository::new(client, db_name)),
            movie: Arc::new(MongoMovieRepository::new(client, db_name)),
            hall: Arc::new(MongoHallRepository::new(client, db_name, cinema.clone())),
            booking: Arc::new(MongoBookingRepository::new(client, db_name)),
            cinema,
        }
    }

    pub fn in_memory() -> Self {
        let cinema: Arc<dyn CinemaRepository> = Arc::new(memory::InMemoryCinemaRepository::default());
        Store {
            user: Arc::new(memory::InMemoryUserRepository::default()),
            movie: Arc::new(memory::InMemoryMovieRepository::default()),
            hall: Arc::new(memory::InMemoryHallRepository::new(cinema.clone())),
            booking: Arc::new(memory::InMemoryBookingRepository::default()),
            cinema,
        }
    }
}

/// Connects and pings the deployment so a bad URI fails at startup.
pub async fn connect(uri: &str, db_name: &str) -> StoreResult<Client> {
    let client_options = ClientOptions::parse(uri).await?;
    let client = Client::with_options(client_options)?;

    client
        .database(db_name)
        .run_command(doc! {"ping": 1}, None)
        .await?;
    info!(db = db_name, "Pinged MongoDB deployment");

    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_defaults_and_bounds() {
        let pag = Pagination::default();
        assert_eq!(pag.skip(), 0);
        assert_eq!(pag.limit(), DEFAULT_LIMIT);

        let pag = Pagination::new(Some(3), Some(20));
        assert_eq!(pag.skip(), 40);

        let pag = Pagination::new(Some(0), Some(0));
        assert_eq!(pag.page(), 1);
        assert_eq!(pag.limit(), 1);

        let pag = Pagination::new(None, Some(10_000));
        assert_eq!(pag.limit(), MAX_LIMIT);
    }

    #[test]
    fn pagination_slices_items() {
        let items: Vec<u32> = (0..25).collect();
        assert_eq!(Pagination::new(Some(3), Some(10)).apply(&items), (20..25).collect::<Vec<_>>());
        assert!(Pagination::new(Some(4), Some(10)).apply(&items).is_empty());
    }
}
