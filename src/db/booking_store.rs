use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
    Client, Collection,
};

use crate::models::booking_model::Booking;

use super::{BookingFilter, Pagination, StoreError, StoreResult};

const BOOKING_COLL: &str = "bookings";

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persists a booking and returns it with its assigned id.
    async fn insert_booking(&self, booking: Booking) -> StoreResult<Booking>;

    async fn get_booking_by_id(&self, id: ObjectId) -> StoreResult<Option<Booking>>;

    async fn list_bookings(
        &self,
        filter: &BookingFilter,
        pagination: Pagination,
    ) -> StoreResult<Vec<Booking>>;

    async fn count_bookings(&self, filter: &BookingFilter) -> StoreResult<u64>;

    /// Flips `canceled` to true. Returns false when the booking is missing
    /// or was already canceled.
    async fn mark_canceled(&self, id: ObjectId) -> StoreResult<bool>;
}

pub struct MongoBookingRepository {
    collection: Collection<Booking>,
}

impl MongoBookingRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        MongoBookingRepository {
            collection: client.database(db_name).collection(BOOKING_COLL),
        }
    }
}

#[async_trait]
impl BookingRepository for MongoBookingRepository {
    async fn insert_booking(&self, mut booking: Booking) -> StoreResult<Booking> {
        let result = self.collection.insert_one(&booking, None).await?;
        booking.id = Some(result.inserted_id.as_object_id().ok_or(StoreError::MissingId)?);
        Ok(booking)
    }

    async fn get_booking_by_id(&self, id: ObjectId) -> StoreResult<Option<Booking>> {
        Ok(self.collection.find_one(doc! {"_id": id}, None).await?)
    }

    async fn list_bookings(
        &self,
        filter: &BookingFilter,
        pagination: Pagination,
    ) -> StoreResult<Vec<Booking>> {
        let options = FindOptions::builder()
            .sort(doc! {"_id": 1})
            .skip(pagination.skip())
            .limit(pagination.limit() as i64)
            .build();

        let cursor = self.collection.find(filter.to_document(), options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count_bookings(&self, filter: &BookingFilter) -> StoreResult<u64> {
        Ok(self
            .collection
            .count_documents(filter.to_document(), None)
            .await?)
    }

    async fn mark_canceled(&self, id: ObjectId) -> StoreResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! {"_id": id, "canceled": false},
                doc! {"$set": {"canceled": true}},
                None,
            )
            .await?;
        Ok(result.modified_count == 1)
    }
}
