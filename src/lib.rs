use axum::{
    http::{header, HeaderValue, Method},
    middleware::{from_fn, from_fn_with_state},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

pub mod auth;
pub mod booking;
pub mod config;
pub mod controllers;
pub mod db;
pub mod error;
pub mod extractors;
pub mod models;
pub mod state;
pub mod utils;
pub mod websockets;

use auth::{admin_middleware, auth_middleware, middleware::API_TOKEN_HEADER};
use controllers::{
    auth_controller::authenticate,
    booking_controller::{cancel_booking, load_booking, load_bookings},
    cinema_controller::{add_cinema, load_cinema, load_cinema_halls, load_cinemas},
    hall_controller::{add_hall, book_hall, load_hall_availability, load_halls},
    home_controller,
    movie_controller::{add_movie, load_movie, load_movies},
    user_controller::{add_user, delete_user, load_user, load_users, update_user},
};
use state::AppState;
use websockets::websocket_handler;

pub fn create_router(state: AppState, cors_origin: HeaderValue) -> Router {
    let admin = Router::new()
        .route("/booking", get(load_bookings))
        .route("/cinema", post(add_cinema))
        .route("/movie", post(add_movie))
        .route("/hall", post(add_hall))
        .route_layer(from_fn(admin_middleware));

    let api_v1 = Router::new()
        .route("/user", get(load_users).post(add_user))
        .route(
            "/user/:id",
            get(load_user).put(update_user).delete(delete_user),
        )
        .route("/cinema", get(load_cinemas))
        .route("/cinema/:id", get(load_cinema))
        .route("/cinema/:id/halls", get(load_cinema_halls))
        .route("/hall", get(load_halls))
        .route("/hall/:id/book", post(book_hall))
        .route("/hall/:id/availability", get(load_hall_availability))
        .route("/movie", get(load_movies))
        .route("/movie/:id", get(load_movie))
        .route("/booking", get(load_bookings))
        .route("/booking/:id", get(load_booking))
        .route("/booking/:id/cancel", get(cancel_booking).post(cancel_booking))
        .nest("/admin", admin)
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/", get(home_controller::index))
        .route("/ws", get(websocket_handler))
        .route("/api/auth", post(authenticate))
        .nest("/api/v1", api_v1)
        .layer(
            CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_origin(cors_origin)
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::AUTHORIZATION,
                    API_TOKEN_HEADER,
                ]),
        )
        .with_state(state)
}
