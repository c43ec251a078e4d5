//! Crew recruitment pipeline

use super::ApiResult;
use crate::api::rest::{
    dto::{CandidateQuery, ListResponse, StageRequest},
    error::{JsonBody, QueryParams},
};
use crate::contract::{Caller, Candidate, CandidateUpdate, NewCandidate};
use crate::domain::FleetServices;
use axum::{
    extract::Path,
    http::StatusCode,
    Extension, Json,
};

pub async fn create_candidate(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewCandidate>,
) -> ApiResult<(StatusCode, Json<Candidate>)> {
    let candidate = svc.candidates.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(candidate)))
}

pub async fn list_candidates(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<CandidateQuery>,
) -> ApiResult<Json<ListResponse<Candidate>>> {
    Ok(Json(svc.candidates.list(&caller, query.into()).await?.into()))
}

pub async fn get_candidate(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Candidate>> {
    Ok(Json(svc.candidates.get(&caller, &id).await?))
}

pub async fn update_candidate(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<CandidateUpdate>,
) -> ApiResult<Json<Candidate>> {
    Ok(Json(svc.candidates.update(&caller, &id, req).await?))
}

pub async fn set_candidate_stage(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<StageRequest>,
) -> ApiResult<Json<Candidate>> {
    Ok(Json(svc.candidates.set_stage(&caller, &id, req.stage).await?))
}

pub async fn delete_candidate(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.candidates.delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
