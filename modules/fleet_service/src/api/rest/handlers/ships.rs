use super::ApiResult;
use crate::api::rest::{dto::ListResponse, error::JsonBody};
use crate::contract::{Caller, NewShip, Ship, ShipUpdate};
use crate::domain::FleetServices;
use axum::{extract::Path, http::StatusCode, Extension, Json};

pub async fn create_ship(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewShip>,
) -> ApiResult<(StatusCode, Json<Ship>)> {
    let ship = svc.ships.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(ship)))
}

pub async fn list_ships(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
) -> ApiResult<Json<ListResponse<Ship>>> {
    Ok(Json(svc.ships.list(&caller).await?.into()))
}

pub async fn get_ship(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Ship>> {
    Ok(Json(svc.ships.get(&caller, &id).await?))
}

pub async fn update_ship(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ShipUpdate>,
) -> ApiResult<Json<Ship>> {
    Ok(Json(svc.ships.update(&caller, &id, req).await?))
}

pub async fn delete_ship(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.ships.delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
