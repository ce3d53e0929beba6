use movie_booking_api::{
    auth::JwtService, config::AppConfig, create_router, db, state::AppState,
};
use shuttle_secrets::SecretStore;
use tracing::info;

#[shuttle_runtime::main]
async fn main(#[shuttle_secrets::Secrets] secret_store: SecretStore) -> shuttle_axum::ShuttleAxum {
    // Secrets are defined in `Secrets.toml`.
    let config = AppConfig::from_lookup(|key| secret_store.get(key)).map_err(anyhow::Error::from)?;
    let cors_origin = config.cors_origin().map_err(anyhow::Error::from)?;

    let client = db::connect(&config.mongodb_uri, &config.db_name)
        .await
        .map_err(anyhow::Error::from)?;
    let store = db::Store::mongo(&client, &config.db_name);

    let state = AppState::new(store, JwtService::new(config.jwt.clone()), config.admission);
    info!(
        scope_by_date = config.admission.scope_by_date,
        lock_timeout_ms = config.admission.lock_timeout.as_millis() as u64,
        "Booking admission configured"
    );

    // For a deployment outside shuttle, bind a listener instead:
    // let listener = tokio::net::TcpListener::bind("0.0.0.0:4000").await?;
    // axum::serve(listener, create_router(state, cors_origin)).await?;

    Ok(create_router(state, cors_origin).into())
}
