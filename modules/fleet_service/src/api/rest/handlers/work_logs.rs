use super::ApiResult;
use crate::api::rest::{
    dto::{ListResponse, WorkLogQuery},
    error::{JsonBody, QueryParams},
};
use crate::contract::{Caller, NewWorkLog, WorkLog, WorkLogUpdate};
use crate::domain::FleetServices;
use axum::{
    extract::Path,
    http::StatusCode,
    Extension, Json,
};

pub async fn create_work_log(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewWorkLog>,
) -> ApiResult<(StatusCode, Json<WorkLog>)> {
    let log = svc.work_logs.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn list_work_logs(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<WorkLogQuery>,
) -> ApiResult<Json<ListResponse<WorkLog>>> {
    Ok(Json(svc.work_logs.list(&caller, query.into()).await?.into()))
}

pub async fn get_work_log(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkLog>> {
    Ok(Json(svc.work_logs.get(&caller, &id).await?))
}

pub async fn update_work_log(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<WorkLogUpdate>,
) -> ApiResult<Json<WorkLog>> {
    Ok(Json(svc.work_logs.update(&caller, &id, req).await?))
}

pub async fn approve_work_log(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkLog>> {
    Ok(Json(svc.work_logs.approve(&caller, &id).await?))
}

pub async fn reject_work_log(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<WorkLog>> {
    Ok(Json(svc.work_logs.reject(&caller, &id).await?))
}

pub async fn delete_work_log(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.work_logs.delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
