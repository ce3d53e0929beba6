use serde::Serialize;

pub mod booking_model;
pub mod cinema_model;
pub mod hall_model;
pub mod movie_model;
pub mod user_model;

/// `{"type": ..., "msg": ...}` body used for acks and errors.
#[derive(Debug, Serialize)]
pub struct GenericResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub msg: String,
}

impl GenericResponse {
    pub fn success(msg: impl Into<String>) -> Self {
        GenericResponse {
            kind: "success",
            msg: msg.into(),
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        GenericResponse {
            kind: "error",
            msg: msg.into(),
        }
    }
}

/// Paginated listing envelope.
#[derive(Debug, Serialize)]
pub struct ResourceResponse<T> {
    pub results: usize,
    pub data: Vec<T>,
    pub page: u64,
}

impl<T> ResourceResponse<T> {
    pub fn new(data: Vec<T>, page: u64) -> Self {
        ResourceResponse {
            results: data.len(),
            data,
            page,
        }
    }
}
