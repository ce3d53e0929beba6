use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
    Client, Collection,
};

use crate::models::cinema_model::Cinema;

use super::{Pagination, StoreError, StoreResult};

const CINEMA_COLL: &str = "cinemas";

#[async_trait]
pub trait CinemaRepository: Send + Sync {
    async fn insert_cinema(&self, cinema: Cinema) -> StoreResult<Cinema>;

    async fn get_cinema_by_id(&self, id: ObjectId) -> StoreResult<Option<Cinema>>;

    async fn list_cinemas(&self, pagination: Pagination) -> StoreResult<Vec<Cinema>>;

    /// Appends a hall id to the cinema. Returns false if the cinema is missing.
    async fn add_hall(&self, cinema_id: ObjectId, hall_id: ObjectId) -> StoreResult<bool>;
}

pub struct MongoCinemaRepository {
    collection: Collection<Cinema>,
}

impl MongoCinemaRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        MongoCinemaRepository {
            collection: client.database(db_name).collection(CINEMA_COLL),
        }
    }
}

#[async_trait]
impl CinemaRepository for MongoCinemaRepository {
    async fn insert_cinema(&self, mut cinema: Cinema) -> StoreResult<Cinema> {
        let result = self.collection.insert_one(&cinema, None).await?;
        cinema.id = Some(result.inserted_id.as_object_id().ok_or(StoreError::MissingId)?);
        Ok(cinema)
    }

    async fn get_cinema_by_id(&self, id: ObjectId) -> StoreResult<Option<Cinema>> {
        Ok(self.collection.find_one(doc! {"_id": id}, None).await?)
    }

    async fn list_cinemas(&self, pagination: Pagination) -> StoreResult<Vec<Cinema>> {
        let options = FindOptions::builder()
            .sort(doc! {"_id": 1})
            .skip(pagination.skip())
            .limit(pagination.limit() as i64)
            .build();

        let cursor = self.collection.find(doc! {}, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn add_hall(&self, cinema_id: ObjectId, hall_id: ObjectId) -> StoreResult<bool> {
        let result = self
            .collection
            .update_one(
                doc! {"_id": cinema_id},
                doc! {"$push": {"halls": hall_id}},
                None,
            )
            .await?;
        Ok(result.matched_count == 1)
    }
}
