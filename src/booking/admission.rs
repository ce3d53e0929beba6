use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use tracing::{debug, info};

use crate::db::{BookingFilter, BookingRepository, HallRepository};
use crate::models::{
    booking_model::{Booking, Session},
    hall_model::Availability,
};

use super::{BookingError, BookingResult, SlotKey, SlotLocks};

pub const DEFAULT_LOCK_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdmissionConfig {
    /// Count capacity per calendar day instead of across all dates.
    pub scope_by_date: bool,
    /// Upper bound on waiting for a slot lock.
    pub lock_timeout: Duration,
}

impl Default for AdmissionConfig {
    fn default() -> Self {
        AdmissionConfig {
            scope_by_date: false,
            lock_timeout: DEFAULT_LOCK_TIMEOUT,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub user_id: ObjectId,
    pub hall_id: ObjectId,
    pub session: Session,
    pub date: DateTime<Utc>,
}

impl BookingRequest {
    pub fn validate(&self, now: DateTime<Utc>) -> BookingResult<()> {
        if self.date <= now {
            return Err(BookingError::InvalidInput("Invalid date.".to_string()));
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct BookingService {
    pub(super) bookings: Arc<dyn BookingRepository>,
    halls: Arc<dyn HallRepository>,
    locks: SlotLocks,
    config: AdmissionConfig,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        halls: Arc<dyn HallRepository>,
        config: AdmissionConfig,
    ) -> Self {
        BookingService {
            bookings,
            halls,
            locks: SlotLocks::new(),
            config,
        }
    }

    pub fn config(&self) -> &AdmissionConfig {
        &self.config
    }

    pub fn locks(&self) -> &SlotLocks {
        &self.locks
    }

    pub fn slot_key(&self, hall_id: ObjectId, session: Session, date: DateTime<Utc>) -> SlotKey {
        SlotKey {
            hall_id,
            session,
            day: self.config.scope_by_date.then(|| date.date_naive()),
        }
    }

    /// Active bookings that consume the capacity of `key`.
    fn slot_filter(key: &SlotKey) -> BookingFilter {
        let filter = BookingFilter::active_in_slot(key.hall_id, key.session);
        match key.day {
            Some(day) => filter.on_day(day),
            None => filter,
        }
    }

    /// Admits the booking if the slot has room left.
    ///
    /// The capacity read, the count and the insert all happen under the
    /// slot's lock. Fails with [`BookingError::Busy`] if the lock cannot be
    /// taken within the configured timeout.
    pub async fn request_booking(&self, request: BookingRequest) -> BookingResult<Booking> {
        request.validate(Utc::now())?;

        let key = self.slot_key(request.hall_id, request.session, request.date);
        let _guard = self.locks.acquire(key, self.config.lock_timeout).await?;

        let capacity = self
            .halls
            .get_hall_capacity(request.hall_id)
            .await?
            .ok_or(BookingError::NotFound("hall"))?;

        let booked = self.bookings.count_bookings(&Self::slot_filter(&key)).await?;
        if booked >= u64::from(capacity) {
            debug!(hall = %request.hall_id, session = %request.session, booked, capacity, "Hall is full");
            return Err(BookingError::HallFull(request.hall_id));
        }

        let booking = self
            .bookings
            .insert_booking(Booking::new(
                request.user_id,
                request.hall_id,
                request.session,
                request.date,
            ))
            .await?;

        info!(
            hall = %request.hall_id,
            session = %request.session,
            user = %request.user_id,
            seat = booked + 1,
            capacity,
            "Booking admitted"
        );

        Ok(booking)
    }

    /// Read-only snapshot of a slot, counted the same way admission counts.
    pub async fn availability(
        &self,
        hall_id: ObjectId,
        session: Session,
        date: DateTime<Utc>,
    ) -> BookingResult<Availability> {
        let capacity = self
            .halls
            .get_hall_capacity(hall_id)
            .await?
            .ok_or(BookingError::NotFound("hall"))?;

        let key = self.slot_key(hall_id, session, date);
        let booked = self.bookings.count_bookings(&Self::slot_filter(&key)).await?;

        Ok(Availability {
            hall_id,
            session,
            day: key.day,
            capacity,
            booked,
            remaining: u64::from(capacity).saturating_sub(booked),
        })
    }
}
