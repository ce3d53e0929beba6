use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use crate::{
    db::{HallFilter, Pagination},
    error::{ApiError, ApiResult},
    extractors::{ApiJson, ApiQuery},
    models::{
        cinema_model::{Cinema, CinemaResponse, CreateCinemaParams},
        hall_model::HallResponse,
        ResourceResponse,
    },
    state::AppState,
    utils::parse_object_id,
};

const MAX_RATING: u8 = 5;

pub async fn load_cinemas(
    State(state): State<AppState>,
    ApiQuery(pagination): ApiQuery<Pagination>,
) -> ApiResult<Json<ResourceResponse<CinemaResponse>>> {
    let cinemas = state.store.cinema.list_cinemas(pagination).await?;
    Ok(Json(ResourceResponse::new(
        cinemas.into_iter().map(CinemaResponse::from).collect(),
        pagination.page(),
    )))
}

pub async fn load_cinema(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> ApiResult<Json<CinemaResponse>> {
    let cinema_id = parse_object_id(&id_str)?;
    let cinema = state
        .store
        .cinema
        .get_cinema_by_id(cinema_id)
        .await?
        .ok_or(ApiError::NotFound("cinema"))?;

    Ok(Json(cinema.into()))
}

pub async fn load_cinema_halls(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> ApiResult<Json<Vec<HallResponse>>> {
    let cinema_id = parse_object_id(&id_str)?;
    if state.store.cinema.get_cinema_by_id(cinema_id).await?.is_none() {
        return Err(ApiError::NotFound("cinema"));
    }

    let halls = state
        .store
        .hall
        .list_halls(&HallFilter::in_cinema(cinema_id))
        .await?;
    Ok(Json(halls.into_iter().map(HallResponse::from).collect()))
}

pub async fn add_cinema(
    State(state): State<AppState>,
    ApiJson(params): ApiJson<CreateCinemaParams>,
) -> ApiResult<(StatusCode, Json<CinemaResponse>)> {
    if params.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Cinema name is required.".to_string()));
    }
    if params.rating > MAX_RATING {
        return Err(ApiError::BadRequest(format!(
            "Cinema rating must be at most {MAX_RATING}."
        )));
    }

    let cinema = state
        .store
        .cinema
        .insert_cinema(Cinema {
            id: None,
            name: params.name,
            location: params.location,
            halls: Vec::new(),
            rating: params.rating,
        })
        .await?;

    info!(name = %cinema.name, "Cinema created");
    Ok((StatusCode::CREATED, Json(cinema.into())))
}
