use chrono::{DateTime, NaiveDate, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::{serialize_object_id, serialize_object_id_hex};

use super::booking_model::Session;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Hall {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub capacity: u32,
    pub price: f64,
    pub movie_id: ObjectId,
    pub cinema_id: ObjectId,
}

#[derive(Serialize, Debug)]
pub struct HallResponse {
    #[serde(serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    pub capacity: u32,
    pub price: f64,
    #[serde(serialize_with = "serialize_object_id_hex")]
    pub movie_id: ObjectId,
    #[serde(serialize_with = "serialize_object_id_hex")]
    pub cinema_id: ObjectId,
}

impl From<Hall> for HallResponse {
    fn from(hall: Hall) -> Self {
        HallResponse {
            id: hall.id,
            capacity: hall.capacity,
            price: hall.price,
            movie_id: hall.movie_id,
            cinema_id: hall.cinema_id,
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CreateHallParams {
    pub capacity: u32,
    pub price: f64,
    pub movie_id: String,
    pub cinema_id: String,
}

impl CreateHallParams {
    pub fn validate(&self) -> Result<(), String> {
        if self.capacity == 0 {
            return Err("Hall capacity must be greater than zero.".to_string());
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err("Hall price must be a non-negative number.".to_string());
        }
        Ok(())
    }
}

#[derive(Deserialize, Debug)]
pub struct AvailabilityQuery {
    pub session: Session,
    pub date: DateTime<Utc>,
}

/// Seats left for one hall slot.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Availability {
    #[serde(serialize_with = "serialize_object_id_hex")]
    pub hall_id: ObjectId,
    pub session: Session,
    /// Present only when capacity is tracked per calendar day.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<NaiveDate>,
    pub capacity: u32,
    pub booked: u64,
    pub remaining: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(capacity: u32, price: f64) -> CreateHallParams {
        CreateHallParams {
            capacity,
            price,
            movie_id: ObjectId::new().to_hex(),
            cinema_id: ObjectId::new().to_hex(),
        }
    }

    #[test]
    fn capacity_must_be_positive() {
        assert!(params(0, 10.0).validate().is_err());
        assert!(params(1, 10.0).validate().is_ok());
    }

    #[test]
    fn price_must_be_non_negative() {
        assert!(params(10, -1.0).validate().is_err());
        assert!(params(10, f64::NAN).validate().is_err());
        assert!(params(10, 0.0).validate().is_ok());
    }
}
