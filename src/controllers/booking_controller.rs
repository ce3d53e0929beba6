use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};

use crate::{
    auth::AuthUser,
    booking::CancelOutcome,
    db::{BookingFilter, Pagination},
    error::ApiResult,
    extractors::ApiQuery,
    models::{
        booking_model::{BookingQuery, BookingResponse},
        GenericResponse, ResourceResponse,
    },
    state::AppState,
    utils::parse_object_id,
    websockets::BOOKING_CANCELED,
};

/// Serves both `/booking` and `/admin/booking`; the service narrows the
/// result to the caller's own bookings unless the caller is an admin.
pub async fn load_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    ApiQuery(query): ApiQuery<BookingQuery>,
) -> ApiResult<Json<ResourceResponse<BookingResponse>>> {
    let pagination = Pagination::new(query.page, query.limit);
    let filter = BookingFilter {
        user_id: query.user_id.as_deref().map(parse_object_id).transpose()?,
        hall_id: query.hall_id.as_deref().map(parse_object_id).transpose()?,
        session: query.session,
        canceled: query.canceled,
        ..Default::default()
    };

    let bookings = state
        .bookings
        .list_bookings(filter, pagination, user.caller())
        .await?;

    Ok(Json(ResourceResponse::new(
        bookings.into_iter().map(BookingResponse::from).collect(),
        pagination.page(),
    )))
}

pub async fn load_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id_str): Path<String>,
) -> ApiResult<Json<BookingResponse>> {
    let booking_id = parse_object_id(&id_str)?;
    let booking = state.bookings.get_booking(booking_id, user.caller()).await?;
    Ok(Json(booking.into()))
}

pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id_str): Path<String>,
) -> ApiResult<Json<GenericResponse>> {
    let booking_id = parse_object_id(&id_str)?;
    let cancellation = state
        .bookings
        .cancel_booking(booking_id, user.caller())
        .await?;

    match cancellation.outcome {
        CancelOutcome::Canceled => {
            state
                .feed
                .announce(BOOKING_CANCELED, &cancellation.booking, &state.bookings)
                .await;
            Ok(Json(GenericResponse::success("Successfully canceled booking.")))
        }
        CancelOutcome::AlreadyCanceled => {
            Ok(Json(GenericResponse::success("Booking was already canceled.")))
        }
    }
}
