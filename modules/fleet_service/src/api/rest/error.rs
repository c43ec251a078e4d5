//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::FleetError;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts, Query, Request,
    },
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: FleetError) -> Problem {
    match error {
        FleetError::Unauthenticated { reason } => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized").with_detail(reason)
        }

        FleetError::Forbidden { reason } => {
            Problem::new(StatusCode::FORBIDDEN, "Forbidden").with_detail(reason)
        }

        FleetError::NotFound { resource, id } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{resource} Not Found"))
                .with_detail(format!("{resource} with id '{id}' was not found"))
        }

        FleetError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        FleetError::Internal => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
        .with_detail("An unexpected error occurred"),
    }
}

impl From<FleetError> for Problem {
    fn from(error: FleetError) -> Self {
        map_domain_error(error)
    }
}

/// `Json` whose rejections are reported as 400 Problem Details
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(map_json_rejection(rejection)),
        }
    }
}

fn map_json_rejection(rejection: JsonRejection) -> Problem {
    Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(rejection.body_text())
}

/// `Query` whose rejections are reported as 400 Problem Details
pub struct QueryParams<T>(pub T);

impl<S, T> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(map_query_rejection(rejection)),
        }
    }
}

fn map_query_rejection(rejection: QueryRejection) -> Problem {
    Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_map_to_status_codes() {
        let cases = [
            (FleetError::unauthenticated("no token"), 401),
            (FleetError::forbidden("crew"), 403),
            (FleetError::not_found("Ship", "s-1"), 404),
            (FleetError::validation("bad"), 400),
            (FleetError::Internal, 500),
        ];
        for (error, status) in cases {
            assert_eq!(map_domain_error(error).status, status);
        }
    }

    #[test]
    fn not_found_names_the_resource() {
        let problem = map_domain_error(FleetError::not_found("Task", "t-9"));
        assert_eq!(problem.title, "Task Not Found");
        assert_eq!(problem.detail.as_deref(), Some("Task with id 't-9' was not found"));
    }
}
