use super::ApiResult;
use crate::api::rest::{dto::ListResponse, error::JsonBody};
use crate::contract::{Caller, NewUser, User, UserUpdate};
use crate::domain::FleetServices;
use axum::{extract::Path, http::StatusCode, Extension, Json};

pub async fn create_user(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewUser>,
) -> ApiResult<(StatusCode, Json<User>)> {
    let user = svc.users.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Profile of the authenticated caller
pub async fn me(Extension(svc): Extension<FleetServices>, caller: Caller) -> ApiResult<Json<User>> {
    Ok(Json(svc.users.me(&caller).await?))
}

pub async fn list_users(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
) -> ApiResult<Json<ListResponse<User>>> {
    Ok(Json(svc.users.list(&caller).await?.into()))
}

pub async fn get_user(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<User>> {
    Ok(Json(svc.users.get(&caller, &id).await?))
}

pub async fn list_users_by_ship(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(ship_id): Path<String>,
) -> ApiResult<Json<ListResponse<User>>> {
    Ok(Json(svc.users.list_by_ship(&caller, &ship_id).await?.into()))
}

pub async fn update_user(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UserUpdate>,
) -> ApiResult<Json<User>> {
    Ok(Json(svc.users.update(&caller, &id, req).await?))
}

pub async fn delete_user(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.users.delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
