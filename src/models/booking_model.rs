use std::fmt;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::utils::{serialize_object_id, serialize_object_id_hex};

/// Screening slot of a hall within a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl Session {
    pub const ALL: [Session; 4] = [
        Session::Morning,
        Session::Afternoon,
        Session::Evening,
        Session::Night,
    ];

    /// Stored representation, matches the serde name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Morning => "morning",
            Session::Afternoon => "afternoon",
            Session::Evening => "evening",
            Session::Night => "night",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Booking document as stored in the `bookings` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub hall_id: ObjectId,
    pub session: Session,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub canceled: bool,
}

impl Booking {
    pub fn new(user_id: ObjectId, hall_id: ObjectId, session: Session, date: DateTime<Utc>) -> Self {
        Booking {
            id: None,
            user_id,
            hall_id,
            session,
            date,
            canceled: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    #[serde(serialize_with = "serialize_object_id")]
    pub id: Option<ObjectId>,
    #[serde(serialize_with = "serialize_object_id_hex")]
    pub user_id: ObjectId,
    #[serde(serialize_with = "serialize_object_id_hex")]
    pub hall_id: ObjectId,
    pub session: Session,
    pub date: DateTime<Utc>,
    pub canceled: bool,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        BookingResponse {
            id: booking.id,
            user_id: booking.user_id,
            hall_id: booking.hall_id,
            session: booking.session,
            date: booking.date,
            canceled: booking.canceled,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BookHallParams {
    pub session: Session,
    pub date: DateTime<Utc>,
}

/// Query string of the booking listing routes.
#[derive(Debug, Default, Deserialize)]
pub struct BookingQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub canceled: Option<bool>,
    #[serde(alias = "hall")]
    pub hall_id: Option<String>,
    pub session: Option<Session>,
    /// Honored for admins only.
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_serializes_lowercase() {
        for session in Session::ALL {
            let json = serde_json::to_value(session).unwrap();
            assert_eq!(json, session.as_str());
        }
        let parsed: Session = serde_json::from_str("\"night\"").unwrap();
        assert_eq!(parsed, Session::Night);
        assert!(serde_json::from_str::<Session>("\"brunch\"").is_err());
    }

    #[test]
    fn response_renders_ids_as_hex() {
        let booking = Booking {
            id: Some(ObjectId::new()),
            ..Booking::new(ObjectId::new(), ObjectId::new(), Session::Evening, Utc::now())
        };
        let json = serde_json::to_value(BookingResponse::from(booking.clone())).unwrap();

        assert_eq!(json["id"], booking.id.unwrap().to_hex());
        assert_eq!(json["hall_id"], booking.hall_id.to_hex());
        assert_eq!(json["session"], "evening");
        assert_eq!(json["canceled"], false);
    }
}
