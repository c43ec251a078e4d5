use super::ApiResult;
use crate::api::rest::{
    dto::{ClientQuery, ListResponse},
    error::{JsonBody, QueryParams},
};
use crate::contract::{Caller, Client, ClientStats, ClientUpdate, NewClient};
use crate::domain::FleetServices;
use axum::{
    extract::Path,
    http::StatusCode,
    Extension, Json,
};

pub async fn create_client(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewClient>,
) -> ApiResult<(StatusCode, Json<Client>)> {
    let client = svc.clients.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn list_clients(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<ClientQuery>,
) -> ApiResult<Json<ListResponse<Client>>> {
    Ok(Json(svc.clients.list(&caller, query.into()).await?.into()))
}

pub async fn client_stats(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
) -> ApiResult<Json<ClientStats>> {
    Ok(Json(svc.clients.stats(&caller).await?))
}

pub async fn get_client(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Client>> {
    Ok(Json(svc.clients.get(&caller, &id).await?))
}

pub async fn update_client(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<ClientUpdate>,
) -> ApiResult<Json<Client>> {
    Ok(Json(svc.clients.update(&caller, &id, req).await?))
}

pub async fn delete_client(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.clients.delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
