//! Request authentication for the `/api/v1` routes

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};
use mongodb::bson::oid::ObjectId;
use tracing::{debug, warn};

use crate::{booking::Caller, error::ApiError, state::AppState};

pub const API_TOKEN_HEADER: HeaderName = HeaderName::from_static("x-api-token");

/// Authenticated caller, inserted into the request extensions
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: ObjectId,
    pub is_admin: bool,
}

impl AuthUser {
    pub fn caller(&self) -> Caller {
        Caller {
            user_id: self.id,
            is_admin: self.is_admin,
        }
    }
}

fn extract_token(headers: &HeaderMap) -> Option<&str> {
    if let Some(token) = headers
        .get(&API_TOKEN_HEADER)
        .and_then(|header| header.to_str().ok())
    {
        return Some(token);
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token(req.headers()).ok_or(ApiError::Unauthorized)?;

    let claims = state.jwt.validate_token(token).map_err(|e| {
        debug!("Rejected api token: {}", e);
        ApiError::Unauthorized
    })?;

    let user_id = ObjectId::parse_str(&claims.sub).map_err(|_| ApiError::Unauthorized)?;

    // Tokens outlive their users; a deleted account must stop working at once.
    let user = state
        .store
        .user
        .get_user_by_id(user_id)
        .await?
        .ok_or_else(|| {
            warn!(user = %user_id, "Valid token for unknown user");
            ApiError::Unauthorized
        })?;

    req.extensions_mut().insert(AuthUser {
        id: user_id,
        is_admin: user.is_admin,
    });

    Ok(next.run(req).await)
}

/// Must run after [`auth_middleware`].
pub async fn admin_middleware(req: Request, next: Next) -> Result<Response, ApiError> {
    match req.extensions().get::<AuthUser>() {
        Some(user) if user.is_admin => Ok(next.run(req).await),
        Some(user) => {
            debug!(user = %user.id, "Non-admin caller on admin route");
            Err(ApiError::Unauthorized)
        }
        None => Err(ApiError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn api_token_header_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-bearer"));
        assert_eq!(extract_token(&headers), Some("from-bearer"));

        headers.insert(API_TOKEN_HEADER, HeaderValue::from_static("from-header"));
        assert_eq!(extract_token(&headers), Some("from-header"));
    }

    #[test]
    fn missing_or_malformed_header_yields_none() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_token(&headers), None);

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(extract_token(&headers), None);
    }
}
