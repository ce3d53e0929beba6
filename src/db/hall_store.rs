use std::sync::Arc;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client, Collection,
};
use tracing::warn;

use crate::models::hall_model::Hall;

use super::{CinemaRepository, HallFilter, StoreError, StoreResult};

const HALL_COLL: &str = "halls";

#[async_trait]
pub trait HallRepository: Send + Sync {
    /// Persists a hall and links it into its cinema's hall list.
    async fn insert_hall(&self, hall: Hall) -> StoreResult<Hall>;

    async fn get_hall_by_id(&self, id: ObjectId) -> StoreResult<Option<Hall>>;

    async fn list_halls(&self, filter: &HallFilter) -> StoreResult<Vec<Hall>>;

    async fn get_hall_capacity(&self, id: ObjectId) -> StoreResult<Option<u32>> {
        Ok(self.get_hall_by_id(id).await?.map(|hall| hall.capacity))
    }
}

pub struct MongoHallRepository {
    collection: Collection<Hall>,
    cinemas: Arc<dyn CinemaRepository>,
}

impl MongoHallRepository {
    pub fn new(client: &Client, db_name: &str, cinemas: Arc<dyn CinemaRepository>) -> Self {
        MongoHallRepository {
            collection: client.database(db_name).collection(HALL_COLL),
            cinemas,
        }
    }
}

#[async_trait]
impl HallRepository for MongoHallRepository {
    async fn insert_hall(&self, mut hall: Hall) -> StoreResult<Hall> {
        let result = self.collection.insert_one(&hall, None).await?;
        let id = result.inserted_id.as_object_id().ok_or(StoreError::MissingId)?;
        hall.id = Some(id);

        if !self.cinemas.add_hall(hall.cinema_id, id).await? {
            warn!(hall = %id, cinema = %hall.cinema_id, "Hall inserted for unknown cinema");
        }

        Ok(hall)
    }

    async fn get_hall_by_id(&self, id: ObjectId) -> StoreResult<Option<Hall>> {
        Ok(self.collection.find_one(doc! {"_id": id}, None).await?)
    }

    async fn list_halls(&self, filter: &HallFilter) -> StoreResult<Vec<Hall>> {
        let cursor = self.collection.find(filter.to_document(), None).await?;
        Ok(cursor.try_collect().await?)
    }
}
