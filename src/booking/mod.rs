//! Booking admission and the booking record operations.
//!
//! Admission is the only path that creates bookings. It reads the hall
//! capacity, counts the active bookings of the slot and inserts the new
//! booking while holding the slot's entry in [`SlotLocks`], so concurrent
//! requests for the same slot can never push the active count past capacity.
//! Cancellation is the only mutation of an existing booking.

use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::db::StoreError;
use crate::models::booking_model::Booking;

pub mod admission;
pub mod records;
pub mod slot_lock;

pub use admission::{AdmissionConfig, BookingRequest, BookingService};
pub use slot_lock::{SlotGuard, SlotKey, SlotLocks};

#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Business outcome: the slot already holds `capacity` active bookings.
    #[error("Hall {} is full.", .0.to_hex())]
    HallFull(ObjectId),

    #[error("Not authorized.")]
    Unauthorized,

    #[error("{0}")]
    InvalidInput(String),

    /// The slot lock could not be taken in time; safe to retry.
    #[error("booking slot is busy, try again")]
    Busy,

    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub type BookingResult<T> = Result<T, BookingError>;

/// Identity the HTTP layer has already authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: ObjectId,
    pub is_admin: bool,
}

impl Caller {
    /// Owners see their own bookings; admins see all of them.
    pub fn can_access(&self, booking: &Booking) -> bool {
        self.is_admin || booking.user_id == self.user_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Canceled,
    AlreadyCanceled,
}

#[derive(Debug, Clone)]
pub struct Cancellation {
    pub booking: Booking,
    pub outcome: CancelOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking_model::Session;
    use chrono::Utc;

    #[test]
    fn hall_full_message_carries_hex_id() {
        let hall_id = ObjectId::new();
        assert_eq!(
            BookingError::HallFull(hall_id).to_string(),
            format!("Hall {} is full.", hall_id.to_hex())
        );
    }

    #[test]
    fn only_owner_or_admin_can_access() {
        let owner = ObjectId::new();
        let booking = Booking::new(owner, ObjectId::new(), Session::Morning, Utc::now());

        let as_owner = Caller { user_id: owner, is_admin: false };
        let as_stranger = Caller { user_id: ObjectId::new(), is_admin: false };
        let as_admin = Caller { user_id: ObjectId::new(), is_admin: true };

        assert!(as_owner.can_access(&booking));
        assert!(!as_stranger.can_access(&booking));
        assert!(as_admin.can_access(&booking));
    }
}
