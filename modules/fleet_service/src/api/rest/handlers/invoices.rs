use super::ApiResult;
use crate::api::rest::{
    dto::{InvoiceQuery, ListResponse, ReviewRequest, ShipQuery},
    error::{JsonBody, QueryParams},
};
use crate::contract::{Caller, Invoice, InvoiceStats, InvoiceUpdate, NewInvoice};
use crate::domain::FleetServices;
use axum::{
    extract::Path,
    http::StatusCode,
    Extension, Json,
};

pub async fn create_invoice(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewInvoice>,
) -> ApiResult<(StatusCode, Json<Invoice>)> {
    let invoice = svc.invoices.create(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(invoice)))
}

pub async fn list_invoices(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<InvoiceQuery>,
) -> ApiResult<Json<ListResponse<Invoice>>> {
    Ok(Json(svc.invoices.list(&caller, query.into()).await?.into()))
}

pub async fn invoice_stats(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<ShipQuery>,
) -> ApiResult<Json<InvoiceStats>> {
    Ok(Json(svc.invoices.stats(&caller, query.ship_id.as_deref()).await?))
}

pub async fn get_invoice(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(svc.invoices.get(&caller, &id).await?))
}

pub async fn update_invoice(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<InvoiceUpdate>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(svc.invoices.update(&caller, &id, req).await?))
}

pub async fn submit_invoice(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(svc.invoices.submit(&caller, &id).await?))
}

pub async fn approve_invoice(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    body: Option<Json<ReviewRequest>>,
) -> ApiResult<Json<Invoice>> {
    let notes = body.and_then(|Json(req)| req.notes);
    Ok(Json(svc.invoices.approve(&caller, &id, notes).await?))
}

pub async fn reject_invoice(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    body: Option<Json<ReviewRequest>>,
) -> ApiResult<Json<Invoice>> {
    let notes = body.and_then(|Json(req)| req.notes);
    Ok(Json(svc.invoices.reject(&caller, &id, notes).await?))
}

pub async fn mark_invoice_paid(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Invoice>> {
    Ok(Json(svc.invoices.mark_paid(&caller, &id).await?))
}

pub async fn delete_invoice(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.invoices.delete(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
