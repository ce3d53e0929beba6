use serde::{Deserialize, Serialize};
use mongodb::bson::oid::ObjectId;

use crate::utils::serialize_object_id;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Genre {
    Action,
    Comedy,
    Drama,
    Horror,
    Thriller,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movie {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub genre: Genre,
}

#[derive(Debug, Serialize)]
pub struct MovieResponse {
    #[serde(serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub genre: Genre,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        MovieResponse {
            id: movie.id,
            title: movie.title,
            genre: movie.genre,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieParams {
    pub title: String,
    pub genre: Genre,
}
