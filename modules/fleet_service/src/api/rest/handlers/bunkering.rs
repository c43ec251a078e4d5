use super::ApiResult;
use crate::api::rest::{
    dto::{BunkeringQuery, ListResponse},
    error::{JsonBody, QueryParams},
};
use crate::contract::{Bunkering, BunkeringUpdate, Caller, NewBunkering};
use crate::domain::FleetServices;
use axum::{
    extract::Path,
    http::StatusCode,
    Extension, Json,
};

pub async fn create_bunkering(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewBunkering>,
) -> ApiResult<(StatusCode, Json<Bunkering>)> {
    let op = svc.bunkering.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(op)))
}

pub async fn list_bunkering(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<BunkeringQuery>,
) -> ApiResult<Json<ListResponse<Bunkering>>> {
    Ok(Json(svc.bunkering.list(&caller, query.into()).await?.into()))
}

pub async fn get_bunkering(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Bunkering>> {
    Ok(Json(svc.bunkering.get(&caller, &id).await?))
}

pub async fn update_bunkering(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<BunkeringUpdate>,
) -> ApiResult<Json<Bunkering>> {
    Ok(Json(svc.bunkering.update(&caller, &id, req).await?))
}

pub async fn complete_checklist(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Bunkering>> {
    Ok(Json(svc.bunkering.complete_checklist(&caller, &id).await?))
}

pub async fn mark_sample_taken(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Bunkering>> {
    Ok(Json(svc.bunkering.mark_sample_taken(&caller, &id).await?))
}

pub async fn delete_bunkering(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.bunkering.delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
