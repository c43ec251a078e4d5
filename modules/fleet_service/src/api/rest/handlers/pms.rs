//! Planned maintenance tasks

use super::ApiResult;
use crate::api::rest::{
    dto::{ListResponse, TaskQuery},
    error::{JsonBody, QueryParams},
};
use crate::contract::{Caller, NewTask, Task, TaskStats, TaskUpdate};
use crate::domain::FleetServices;
use axum::{
    extract::Path,
    http::StatusCode,
    Extension, Json,
};

pub async fn create_task(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = svc.tasks.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<TaskQuery>,
) -> ApiResult<Json<ListResponse<Task>>> {
    Ok(Json(svc.tasks.list(&caller, query.into()).await?.into()))
}

pub async fn get_task(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(svc.tasks.get(&caller, &id).await?))
}

pub async fn update_task(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<TaskUpdate>,
) -> ApiResult<Json<Task>> {
    Ok(Json(svc.tasks.update(&caller, &id, req).await?))
}

pub async fn approve_task(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(svc.tasks.approve(&caller, &id).await?))
}

pub async fn reject_task(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Task>> {
    Ok(Json(svc.tasks.reject(&caller, &id).await?))
}

pub async fn delete_task(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.tasks.delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn ship_task_stats(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(ship_id): Path<String>,
) -> ApiResult<Json<TaskStats>> {
    Ok(Json(svc.tasks.ship_stats(&caller, &ship_id).await?))
}
