use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Extension,
};

use crate::{
    auth::AuthUser,
    booking::BookingRequest,
    db::HallFilter,
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiQuery},
    models::{
        booking_model::{BookHallParams, BookingResponse},
        hall_model::{Availability, AvailabilityQuery, CreateHallParams, Hall, HallResponse},
    },
    state::AppState,
    utils::parse_object_id,
    websockets::BOOKING_ADMITTED,
};

pub async fn load_halls(State(state): State<AppState>) -> ApiResult<Json<Vec<HallResponse>>> {
    let halls = state.store.hall.list_halls(&HallFilter::default()).await?;
    Ok(Json(halls.into_iter().map(HallResponse::from).collect()))
}

pub async fn add_hall(
    State(state): State<AppState>,
    ApiJson(params): ApiJson<CreateHallParams>,
) -> ApiResult<(StatusCode, Json<HallResponse>)> {
    params.validate().map_err(ApiError::BadRequest)?;

    let cinema_id = parse_object_id(&params.cinema_id)?;
    let movie_id = parse_object_id(&params.movie_id)?;

    if state.store.cinema.get_cinema_by_id(cinema_id).await?.is_none() {
        return Err(ApiError::NotFound("cinema"));
    }
    if state.store.movie.get_movie_by_id(movie_id).await?.is_none() {
        return Err(ApiError::NotFound("movie"));
    }

    let hall = state
        .store
        .hall
        .insert_hall(Hall {
            id: None,
            capacity: params.capacity,
            price: params.price,
            movie_id,
            cinema_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(hall.into())))
}

/// `POST /hall/:id/book`. A malformed session or date is a 400 with the
/// usual error body.
pub async fn book_hall(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id_str): Path<String>,
    ApiJson(params): ApiJson<BookHallParams>,
) -> ApiResult<Json<BookingResponse>> {
    let hall_id = parse_object_id(&id_str)?;

    let booking = state
        .bookings
        .request_booking(BookingRequest {
            user_id: user.id,
            hall_id,
            session: params.session,
            date: params.date,
        })
        .await?;

    state
        .feed
        .announce(BOOKING_ADMITTED, &booking, &state.bookings)
        .await;

    Ok(Json(booking.into()))
}

pub async fn load_hall_availability(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    ApiQuery(query): ApiQuery<AvailabilityQuery>,
) -> ApiResult<Json<Availability>> {
    let hall_id = parse_object_id(&id_str)?;

    let availability = state
        .bookings
        .availability(hall_id, query.session, query.date)
        .await?;
    Ok(Json(availability))
}
