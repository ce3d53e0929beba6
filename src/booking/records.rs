use mongodb::bson::oid::ObjectId;
use tracing::info;

use crate::db::{BookingFilter, Pagination};
use crate::models::booking_model::Booking;

use super::{
    BookingError, BookingResult, BookingService, CancelOutcome, Caller, Cancellation,
};

impl BookingService {
    pub async fn get_booking(&self, id: ObjectId, caller: Caller) -> BookingResult<Booking> {
        let booking = self
            .bookings
            .get_booking_by_id(id)
            .await?
            .ok_or(BookingError::NotFound("booking"))?;

        if !caller.can_access(&booking) {
            return Err(BookingError::Unauthorized);
        }
        Ok(booking)
    }

    /// Non-admin callers are always restricted to their own bookings,
    /// whatever user the filter names.
    pub async fn list_bookings(
        &self,
        mut filter: BookingFilter,
        pagination: Pagination,
        caller: Caller,
    ) -> BookingResult<Vec<Booking>> {
        if !caller.is_admin {
            filter.user_id = Some(caller.user_id);
        }
        Ok(self.bookings.list_bookings(&filter, pagination).await?)
    }

    /// Flips `canceled` on a booking the caller may access.
    ///
    /// A second cancel of the same booking reports
    /// [`CancelOutcome::AlreadyCanceled`] and leaves the record untouched.
    pub async fn cancel_booking(&self, id: ObjectId, caller: Caller) -> BookingResult<Cancellation> {
        let mut booking = self.get_booking(id, caller).await?;

        if booking.canceled || !self.bookings.mark_canceled(id).await? {
            return Ok(Cancellation {
                booking: Booking {
                    canceled: true,
                    ..booking
                },
                outcome: CancelOutcome::AlreadyCanceled,
            });
        }

        booking.canceled = true;
        info!(booking = %id, hall = %booking.hall_id, session = %booking.session, "Booking canceled");

        Ok(Cancellation {
            booking,
            outcome: CancelOutcome::Canceled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::{AdmissionConfig, BookingRequest};
    use crate::db::Store;
    use crate::models::{booking_model::Session, hall_model::Hall};
    use chrono::{Duration, Utc};

    async fn setup() -> (BookingService, Booking) {
        let store = Store::in_memory();
        let hall = store
            .hall
            .insert_hall(Hall {
                id: None,
                capacity: 10,
                price: 9.0,
                movie_id: ObjectId::new(),
                cinema_id: ObjectId::new(),
            })
            .await
            .unwrap();
        let service = BookingService::new(
            store.booking.clone(),
            store.hall.clone(),
            AdmissionConfig::default(),
        );
        let booking = service
            .request_booking(BookingRequest {
                user_id: ObjectId::new(),
                hall_id: hall.id.unwrap(),
                session: Session::Afternoon,
                date: Utc::now() + Duration::days(3),
            })
            .await
            .unwrap();
        (service, booking)
    }

    fn owner_of(booking: &Booking) -> Caller {
        Caller {
            user_id: booking.user_id,
            is_admin: false,
        }
    }

    #[tokio::test]
    async fn stranger_cannot_cancel() {
        let (service, booking) = setup().await;
        let id = booking.id.unwrap();
        let stranger = Caller {
            user_id: ObjectId::new(),
            is_admin: false,
        };

        let err = service.cancel_booking(id, stranger).await.unwrap_err();
        assert!(matches!(err, BookingError::Unauthorized));

        let stored = service.get_booking(id, owner_of(&booking)).await.unwrap();
        assert!(!stored.canceled);
    }

    #[tokio::test]
    async fn second_cancel_is_already_canceled() {
        let (service, booking) = setup().await;
        let id = booking.id.unwrap();

        let first = service.cancel_booking(id, owner_of(&booking)).await.unwrap();
        assert_eq!(first.outcome, CancelOutcome::Canceled);
        assert!(first.booking.canceled);

        let second = service.cancel_booking(id, owner_of(&booking)).await.unwrap();
        assert_eq!(second.outcome, CancelOutcome::AlreadyCanceled);
        assert!(second.booking.canceled);
    }

    #[tokio::test]
    async fn admin_can_cancel_any_booking() {
        let (service, booking) = setup().await;
        let admin = Caller {
            user_id: ObjectId::new(),
            is_admin: true,
        };

        let result = service.cancel_booking(booking.id.unwrap(), admin).await.unwrap();
        assert_eq!(result.outcome, CancelOutcome::Canceled);
    }

    #[tokio::test]
    async fn unknown_booking_is_not_found() {
        let (service, booking) = setup().await;
        let err = service
            .get_booking(ObjectId::new(), owner_of(&booking))
            .await
            .unwrap_err();
        assert!(matches!(err, BookingError::NotFound("booking")));
    }

    #[tokio::test]
    async fn non_admin_listing_is_scoped_to_caller() {
        let (service, booking) = setup().await;
        let stranger = Caller {
            user_id: ObjectId::new(),
            is_admin: false,
        };
        let foreign_filter = BookingFilter {
            user_id: Some(booking.user_id),
            ..Default::default()
        };

        let seen = service
            .list_bookings(foreign_filter.clone(), Pagination::default(), stranger)
            .await
            .unwrap();
        assert!(seen.is_empty());

        let admin = Caller {
            user_id: ObjectId::new(),
            is_admin: true,
        };
        let seen = service
            .list_bookings(foreign_filter, Pagination::default(), admin)
            .await
            .unwrap();
        assert_eq!(seen.len(), 1);
    }
}
