use crate::{
    auth::JwtService,
    booking::{AdmissionConfig, BookingService},
    db::Store,
    websockets::AvailabilityFeed,
};

/// Shared by every handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub bookings: BookingService,
    pub jwt: JwtService,
    pub feed: AvailabilityFeed,
}

impl AppState {
    pub fn new(store: Store, jwt: JwtService, admission: AdmissionConfig) -> Self {
        let bookings = BookingService::new(store.booking.clone(), store.hall.clone(), admission);
        AppState {
            store,
            bookings,
            jwt,
            feed: AvailabilityFeed::new(),
        }
    }
}
