use mongodb::bson::oid::ObjectId;
use serde::Serializer;

use crate::error::ApiError;

pub fn serialize_object_id<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match id {
        Some(id) => serializer.serialize_str(&id.to_hex()),
        None => serializer.serialize_none(),
    }
}

pub fn serialize_object_id_hex<S>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&id.to_hex())
}

pub fn serialize_object_ids<S>(ids: &[ObjectId], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_seq(ids.iter().map(|id| id.to_hex()))
}

/// Parses a path or body id, mapping malformed hex to a 400.
pub fn parse_object_id(id_str: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(id_str).map_err(|_| ApiError::InvalidId)
}
