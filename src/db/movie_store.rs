use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId},
    Client, Collection,
};

use crate::models::movie_model::Movie;

use super::{StoreError, StoreResult};

const MOVIE_COLL: &str = "movies";

#[async_trait]
pub trait MovieRepository: Send + Sync {
    async fn insert_movie(&self, movie: Movie) -> StoreResult<Movie>;

    async fn get_movie_by_id(&self, id: ObjectId) -> StoreResult<Option<Movie>>;

    async fn list_movies(&self) -> StoreResult<Vec<Movie>>;
}

pub struct MongoMovieRepository {
    collection: Collection<Movie>,
}

impl MongoMovieRepository {
    pub fn new(client: &Client, db_name: &str) -> Self {
        MongoMovieRepository {
            collection: client.database(db_name).collection(MOVIE_COLL),
        }
    }
}

#[async_trait]
impl MovieRepository for MongoMovieRepository {
    async fn insert_movie(&self, mut movie: Movie) -> StoreResult<Movie> {
        let result = self.collection.insert_one(&movie, None).await?;
        movie.id = Some(result.inserted_id.as_object_id().ok_or(StoreError::MissingId)?);
        Ok(movie)
    }

    async fn get_movie_by_id(&self, id: ObjectId) -> StoreResult<Option<Movie>> {
        Ok(self.collection.find_one(doc! {"_id": id}, None).await?)
    }

    async fn list_movies(&self) -> StoreResult<Vec<Movie>> {
        let cursor = self.collection.find(doc! {}, None).await?;
        Ok(cursor.try_collect().await?)
    }
}
