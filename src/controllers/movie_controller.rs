use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use tracing::info;

use crate::{
    error::{ApiError, ApiResult},
    extractors::ApiJson,
    models::movie_model::{CreateMovieParams, Movie, MovieResponse},
    state::AppState,
    utils::parse_object_id,
};

pub async fn load_movies(State(state): State<AppState>) -> ApiResult<Json<Vec<MovieResponse>>> {
    let movies = state.store.movie.list_movies().await?;
    Ok(Json(movies.into_iter().map(MovieResponse::from).collect()))
}

pub async fn load_movie(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> ApiResult<Json<MovieResponse>> {
    let movie_id = parse_object_id(&id_str)?;
    let movie = state
        .store
        .movie
        .get_movie_by_id(movie_id)
        .await?
        .ok_or(ApiError::NotFound("movie"))?;

    Ok(Json(movie.into()))
}

pub async fn add_movie(
    State(state): State<AppState>,
    ApiJson(params): ApiJson<CreateMovieParams>,
) -> ApiResult<(StatusCode, Json<MovieResponse>)> {
    if params.title.trim().is_empty() {
        return Err(ApiError::BadRequest("Movie title is required.".to_string()));
    }

    let movie = state
        .store
        .movie
        .insert_movie(Movie {
            id: None,
            title: params.title,
            genre: params.genre,
        })
        .await?;

    info!(title = %movie.title, "Movie created");
    Ok((StatusCode::CREATED, Json(movie.into())))
}
