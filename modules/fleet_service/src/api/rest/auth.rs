//! Bearer authentication middleware and the `Caller` extractor

use super::error::{map_domain_error, Problem};
use crate::contract::Caller;
use crate::domain::AuthGate;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::debug;

/// Resolve the caller for every request and stash it in the extensions
pub async fn authn_middleware(
    State(gate): State<Arc<AuthGate>>,
    mut req: Request,
    next: Next,
) -> Response {
    let authorization = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match gate.authenticate(authorization).await {
        Ok(caller) => {
            req.extensions_mut().insert(caller);
            next.run(req).await
        }
        Err(err) => {
            debug!(error = %err, path = %req.uri().path(), "request rejected by auth gate");
            map_domain_error(err).into_response()
        }
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Caller>()
            .cloned()
            .ok_or_else(|| {
                Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized")
                    .with_detail("Request was not authenticated")
            })
    }
}
