//! Resets the configured database and fills it with sample data.
//!
//! Reads the same settings as the service from the environment and prints
//! api tokens for the seeded user and admin.

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use rand::Rng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use movie_booking_api::{
    auth::JwtService,
    config::AppConfig,
    db::{self, fixtures, Store},
    models::{booking_model::Session, movie_model::Genre},
};

const EXTRA_CINEMAS: usize = 100;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env()?;
    let client = db::connect(&config.mongodb_uri, &config.db_name)
        .await
        .context("connecting to MongoDB")?;
    client.database(&config.db_name).drop(None).await?;
    info!(db = %config.db_name, "Dropped database");

    let store = Store::mongo(&client, &config.db_name);
    let jwt = JwtService::new(config.jwt.clone());

    let user = fixtures::add_user(&store, "Jimmy", "Scott", false).await?;
    let admin = fixtures::add_user(&store, "Admin", "Admin", true).await?;
    for seeded in [&user, &admin] {
        let id = seeded.id.context("seeded user has no id")?;
        println!("{} -> {}", seeded.email, jwt.generate_token(id, &seeded.email)?);
    }

    let cinema = fixtures::add_cinema(&store, "CinemaxX", "Berlin", 5).await?;
    let movie = fixtures::add_movie(&store, "The Dark Knight", Genre::Action).await?;
    let hall = fixtures::add_hall(
        &store,
        100,
        10.0,
        cinema.id.context("cinema has no id")?,
        movie.id.context("movie has no id")?,
    )
    .await?;
    let booking = fixtures::add_booking(
        &store,
        user.id.context("user has no id")?,
        hall.id.context("hall has no id")?,
        Session::Night,
        Utc::now() + Duration::days(5),
    )
    .await?;
    println!("{booking:?}");

    let mut rng = rand::thread_rng();
    for i in 0..EXTRA_CINEMAS {
        let rating = rng.gen_range(0..5);
        fixtures::add_cinema(&store, &format!("Cinema{i}"), &format!("Location{i}"), rating).await?;
    }
    info!(cinemas = EXTRA_CINEMAS + 1, "Seeded database");

    Ok(())
}
