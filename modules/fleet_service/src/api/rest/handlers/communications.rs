//! Communications with the DG Shipping office

use super::ApiResult;
use crate::api::rest::{
    dto::{CommunicationQuery, ListResponse, RespondRequest, ShipQuery},
    error::{JsonBody, QueryParams},
};
use crate::contract::{
    Caller, Communication, CommunicationStats, CommunicationUpdate, NewCommunication,
};
use crate::domain::FleetServices;
use axum::{
    extract::Path,
    http::StatusCode,
    Extension, Json,
};

pub async fn create_communication(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewCommunication>,
) -> ApiResult<(StatusCode, Json<Communication>)> {
    let comm = svc.communications.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(comm)))
}

pub async fn list_communications(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<CommunicationQuery>,
) -> ApiResult<Json<ListResponse<Communication>>> {
    Ok(Json(svc.communications.list(&caller, query.into()).await?.into()))
}

pub async fn communication_stats(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<ShipQuery>,
) -> ApiResult<Json<CommunicationStats>> {
    Ok(Json(
        svc.communications
            .stats(&caller, query.ship_id.as_deref())
            .await?,
    ))
}

pub async fn get_communication(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Communication>> {
    Ok(Json(svc.communications.get(&caller, &id).await?))
}

pub async fn update_communication(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<CommunicationUpdate>,
) -> ApiResult<Json<Communication>> {
    Ok(Json(svc.communications.update(&caller, &id, req).await?))
}

pub async fn respond_to_communication(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<RespondRequest>,
) -> ApiResult<Json<Communication>> {
    Ok(Json(
        svc.communications
            .respond(&caller, &id, req.response, req.mark_completed)
            .await?,
    ))
}

pub async fn complete_communication(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Communication>> {
    Ok(Json(svc.communications.complete(&caller, &id).await?))
}

pub async fn delete_communication(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.communications.delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
