use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    options::FindOptions,
    Client, Collection,
};

use crate::models::user_model::{UpdateUserParams, User};

use super::{Pagination, StoreError, StoreResult};

const USER_COLL: &str = "users";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert_user(&self, user: User) -> StoreResult<User>;

    async fn get_user_by_id(&self, id: ObjectId) -> StoreResult<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn list_users(&self, pagination: Pagination) -> StoreResult<Vec<User>>;

    /// Returns false if no user matched `id`.
    async fn update_user(&self, id: ObjectId, params: &UpdateUserParams) -> StoreResult<bool>;

    /// Returns false if no user matched `id`.
    async fn delete_user(&self, id: ObjectId) -> StoreResult<bool>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        MongoUserRepository {
            collection: client.database(db_name).collection(USER_COLL),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert_user(&self, mut user: User) -> StoreResult<User> {
        let result = self.collection.insert_one(&user, None).await?;
        user.id = Some(result.inserted_id.as_object_id().ok_or(StoreError::MissingId)?);
        Ok(user)
    }

    async fn get_user_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        Ok(self.collection.find_one(doc! {"_id": id}, None).await?)
    }

    async fn get_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self.collection.find_one(doc! {"email": email}, None).await?)
    }

    async fn list_users(&self, pagination: Pagination) -> StoreResult<Vec<User>> {
        let options = FindOptions::builder()
            .sort(doc! {"_id": 1})
            .skip(pagination.skip())
            .limit(pagination.limit() as i64)
            .build();

        let cursor = self.collection.find(doc! {}, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_user(&self, id: ObjectId, params: &UpdateUserParams) -> StoreResult<bool> {
        let update = params.to_document();
        if update.is_empty() {
            return Ok(self.get_user_by_id(id).await?.is_some());
        }

        let result = self
            .collection
            .update_one(doc! {"_id": id}, doc! {"$set": update}, None)
            .await?;
        Ok(result.matched_count == 1)
    }

    async fn delete_user(&self, id: ObjectId) -> StoreResult<bool> {
        let result = self.collection.delete_one(doc! {"_id": id}, None).await?;
        Ok(result.deleted_count == 1)
    }
}
