//! Actor identification middleware
//!
//! The engine never verifies credentials: the upstream gateway
//! authenticates callers and forwards the resolved actor id in the
//! `X-Actor-Id` header. This middleware extracts it and injects an
//! `ActorId` into request extensions for mutating handlers.

use axum::{body::Body, http::Request, middleware::Next, response::Response};
use uuid::Uuid;

use crate::domain::entities::ActorId;
use crate::error::AppError;

pub const ACTOR_HEADER: &str = "x-actor-id";

/// Extract the actor id from the identity header
fn extract_actor(request: &Request<Body>) -> Option<ActorId> {
    request
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|h| h.to_str().ok())
        .and_then(|raw| Uuid::parse_str(raw).ok())
        .map(ActorId)
}

/// Actor middleware
///
/// Mutating routes require a resolved actor; requests without a valid
/// `X-Actor-Id` header are rejected before reaching the handler.
pub async fn actor_middleware(
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let actor = extract_actor(&request).ok_or(AppError::Unauthorized)?;

    request.extensions_mut().insert(actor);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_valid_actor_header() {
        let id = Uuid::new_v4();
        let request = Request::builder()
            .header("X-Actor-Id", id.to_string())
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract_actor(&request), Some(ActorId(id)));
    }

    #[test]
    fn missing_header_yields_none() {
        let request = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(extract_actor(&request), None);
    }

    #[test]
    fn malformed_uuid_yields_none() {
        let request = Request::builder()
            .header("X-Actor-Id", "not-a-uuid")
            .body(Body::empty())
            .unwrap();

        assert_eq!(extract_actor(&request), None);
    }
}
