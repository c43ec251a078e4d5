use super::ApiResult;
use crate::api::rest::{
    dto::{CargoQuery, ListResponse},
    error::{JsonBody, QueryParams},
};
use crate::contract::{Caller, Cargo, CargoUpdate, NewCargo};
use crate::domain::FleetServices;
use axum::{extract::Path, http::StatusCode, Extension, Json};

pub async fn create_cargo(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewCargo>,
) -> ApiResult<(StatusCode, Json<Cargo>)> {
    let op = svc.cargo.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(op)))
}

pub async fn list_cargo(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<CargoQuery>,
) -> ApiResult<Json<ListResponse<Cargo>>> {
    Ok(Json(svc.cargo.list(&caller, query.into()).await?.into()))
}

pub async fn get_cargo(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Cargo>> {
    Ok(Json(svc.cargo.get(&caller, &id).await?))
}

pub async fn update_cargo(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<CargoUpdate>,
) -> ApiResult<Json<Cargo>> {
    Ok(Json(svc.cargo.update(&caller, &id, req).await?))
}
