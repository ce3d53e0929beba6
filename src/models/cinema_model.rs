use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::{serialize_object_id, serialize_object_ids};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cinema {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub halls: Vec<ObjectId>,
    pub rating: u8,
}

#[derive(Serialize, Debug)]
pub struct CinemaResponse {
    #[serde(serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub location: String,
    #[serde(serialize_with = "serialize_object_ids")]
    pub halls: Vec<ObjectId>,
    pub rating: u8,
}

impl From<Cinema> for CinemaResponse {
    fn from(cinema: Cinema) -> Self {
        CinemaResponse {
            id: cinema.id,
            name: cinema.name,
            location: cinema.location,
            halls: cinema.halls,
            rating: cinema.rating,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CreateCinemaParams {
    pub name: String,
    pub location: String,
    #[serde(default)]
    pub rating: u8,
}
