//! Typed query filters.
//!
//! The same filter value drives the MongoDB query document and the in-memory
//! predicate, so both backends agree on which bookings a query selects.

use chrono::{DateTime, Days, NaiveDate, Utc};
use mongodb::bson::{self, doc, oid::ObjectId, Document};

use crate::models::booking_model::{Booking, Session};
use crate::models::hall_model::Hall;

/// Half-open `[start, end)` interval over booking dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// The UTC calendar day containing `day`.
    pub fn day(day: NaiveDate) -> Self {
        let start = day.and_time(chrono::NaiveTime::MIN).and_utc();
        let end = day
            .checked_add_days(Days::new(1))
            .map(|next| next.and_time(chrono::NaiveTime::MIN).and_utc())
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        DateRange { start, end }
    }

    pub fn contains(&self, date: &DateTime<Utc>) -> bool {
        self.start <= *date && *date < self.end
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingFilter {
    pub user_id: Option<ObjectId>,
    pub hall_id: Option<ObjectId>,
    pub session: Option<Session>,
    pub canceled: Option<bool>,
    pub date_range: Option<DateRange>,
}

impl BookingFilter {
    /// Non-canceled bookings occupying a hall slot.
    pub fn active_in_slot(hall_id: ObjectId, session: Session) -> Self {
        BookingFilter {
            hall_id: Some(hall_id),
            session: Some(session),
            canceled: Some(false),
            ..Default::default()
        }
    }

    pub fn on_day(mut self, day: NaiveDate) -> Self {
        self.date_range = Some(DateRange::day(day));
        self
    }

    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(user_id) = self.user_id {
            filter.insert("user_id", user_id);
        }
        if let Some(hall_id) = self.hall_id {
            filter.insert("hall_id", hall_id);
        }
        if let Some(session) = self.session {
            filter.insert("session", session.as_str());
        }
        if let Some(canceled) = self.canceled {
            filter.insert("canceled", canceled);
        }
        if let Some(range) = self.date_range {
            filter.insert(
                "date",
                doc! {
                    "$gte": bson::DateTime::from_chrono(range.start),
                    "$lt": bson::DateTime::from_chrono(range.end),
                },
            );
        }
        filter
    }

    pub fn matches(&self, booking: &Booking) -> bool {
        self.user_id.map_or(true, |id| booking.user_id == id)
            && self.hall_id.map_or(true, |id| booking.hall_id == id)
            && self.session.map_or(true, |s| booking.session == s)
            && self.canceled.map_or(true, |c| booking.canceled == c)
            && self
                .date_range
                .map_or(true, |range| range.contains(&booking.date))
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HallFilter {
    pub cinema_id: Option<ObjectId>,
}

impl HallFilter {
    pub fn in_cinema(cinema_id: ObjectId) -> Self {
        HallFilter {
            cinema_id: Some(cinema_id),
        }
    }

    pub fn to_document(&self) -> Document {
        let mut filter = Document::new();
        if let Some(cinema_id) = self.cinema_id {
            filter.insert("cinema_id", cinema_id);
        }
        filter
    }

    pub fn matches(&self, hall: &Hall) -> bool {
        self.cinema_id.map_or(true, |id| hall.cinema_id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn booking_at(date: DateTime<Utc>) -> Booking {
        Booking::new(ObjectId::new(), ObjectId::new(), Session::Night, date)
    }

    #[test]
    fn slot_filter_document() {
        let hall_id = ObjectId::new();
        let filter = BookingFilter::active_in_slot(hall_id, Session::Morning);

        assert_eq!(
            filter.to_document(),
            doc! { "hall_id": hall_id, "session": "morning", "canceled": false }
        );
    }

    #[test]
    fn day_filter_adds_date_bounds() {
        let day = NaiveDate::from_ymd_opt(2030, 5, 17).unwrap();
        let document = BookingFilter::default().on_day(day).to_document();
        let bounds = document.get_document("date").unwrap();

        assert_eq!(
            bounds.get_datetime("$gte").unwrap().to_chrono(),
            Utc.with_ymd_and_hms(2030, 5, 17, 0, 0, 0).unwrap()
        );
        assert_eq!(
            bounds.get_datetime("$lt").unwrap().to_chrono(),
            Utc.with_ymd_and_hms(2030, 5, 18, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn matches_respects_every_field() {
        let mut booking = booking_at(Utc.with_ymd_and_hms(2030, 5, 17, 21, 0, 0).unwrap());
        let filter = BookingFilter::active_in_slot(booking.hall_id, Session::Night)
            .on_day(NaiveDate::from_ymd_opt(2030, 5, 17).unwrap());
        assert!(filter.matches(&booking));

        booking.canceled = true;
        assert!(!filter.matches(&booking));
        booking.canceled = false;

        let other_day = BookingFilter::active_in_slot(booking.hall_id, Session::Night)
            .on_day(NaiveDate::from_ymd_opt(2030, 5, 18).unwrap());
        assert!(!other_day.matches(&booking));

        let other_session = BookingFilter::active_in_slot(booking.hall_id, Session::Morning);
        assert!(!other_session.matches(&booking));

        let other_user = BookingFilter {
            user_id: Some(ObjectId::new()),
            ..Default::default()
        };
        assert!(!other_user.matches(&booking));
        assert!(BookingFilter::default().matches(&booking));
    }

    #[test]
    fn hall_filter_by_cinema() {
        let cinema_id = ObjectId::new();
        let hall = Hall {
            id: None,
            capacity: 10,
            price: 5.0,
            movie_id: ObjectId::new(),
            cinema_id,
        };
        assert!(HallFilter::in_cinema(cinema_id).matches(&hall));
        assert!(!HallFilter::in_cinema(ObjectId::new()).matches(&hall));
        assert_eq!(HallFilter::default().to_document(), Document::new());
    }
}
