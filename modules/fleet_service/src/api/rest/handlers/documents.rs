//! Manuals, form templates, work triggers and form submissions

use super::ApiResult;
use crate::api::rest::{
    dto::{ListResponse, ManualQuery, ReviewRequest, SubmissionQuery, TemplateQuery, TriggerWorkRequest},
    error::{JsonBody, QueryParams},
};
use crate::contract::{
    Caller, FormSubmission, FormTemplate, Manual, NewFormTemplate, NewManual, SubmissionUpdate,
    WorkOrder,
};
use crate::domain::FleetServices;
use axum::{
    extract::Path,
    http::StatusCode,
    Extension, Json,
};

// ===== Manuals =====

pub async fn create_manual(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewManual>,
) -> ApiResult<(StatusCode, Json<Manual>)> {
    let manual = svc.documents.create_manual(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(manual)))
}

pub async fn list_manuals(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<ManualQuery>,
) -> ApiResult<Json<ListResponse<Manual>>> {
    Ok(Json(
        svc.documents
            .list_manuals(&caller, query.manual_type)
            .await?
            .into(),
    ))
}

pub async fn get_manual(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Manual>> {
    Ok(Json(svc.documents.get_manual(&caller, &id).await?))
}

pub async fn delete_manual(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.documents.delete_manual(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Templates =====

pub async fn create_template(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<NewFormTemplate>,
) -> ApiResult<(StatusCode, Json<FormTemplate>)> {
    let template = svc.documents.create_template(&caller, req).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

pub async fn list_templates(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<TemplateQuery>,
) -> ApiResult<Json<ListResponse<FormTemplate>>> {
    Ok(Json(
        svc.documents
            .list_templates(&caller, query.category)
            .await?
            .into(),
    ))
}

pub async fn get_template(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<FormTemplate>> {
    Ok(Json(svc.documents.get_template(&caller, &id).await?))
}

pub async fn delete_template(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    svc.documents.delete_template(&caller, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ===== Work assignment =====

pub async fn trigger_work(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    JsonBody(req): JsonBody<TriggerWorkRequest>,
) -> ApiResult<(StatusCode, Json<ListResponse<FormSubmission>>)> {
    let order = WorkOrder::try_from(req)?;
    let created = svc.fanout.trigger_work(&caller, order).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

// ===== Submissions =====

pub async fn list_submissions(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    QueryParams(query): QueryParams<SubmissionQuery>,
) -> ApiResult<Json<ListResponse<FormSubmission>>> {
    Ok(Json(svc.submissions.list(&caller, query.into()).await?.into()))
}

pub async fn get_submission(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<FormSubmission>> {
    Ok(Json(svc.submissions.get(&caller, &id).await?))
}

pub async fn update_submission(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<SubmissionUpdate>,
) -> ApiResult<Json<FormSubmission>> {
    Ok(Json(svc.submissions.update(&caller, &id, req).await?))
}

pub async fn approve_submission(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    body: Option<Json<ReviewRequest>>,
) -> ApiResult<Json<FormSubmission>> {
    let notes = body.and_then(|Json(req)| req.notes);
    Ok(Json(svc.submissions.approve(&caller, &id, notes).await?))
}

pub async fn reject_submission(
    Extension(svc): Extension<FleetServices>,
    caller: Caller,
    Path(id): Path<String>,
    body: Option<Json<ReviewRequest>>,
) -> ApiResult<Json<FormSubmission>> {
    let notes = body.and_then(|Json(req)| req.notes);
    Ok(Json(svc.submissions.reject(&caller, &id, notes).await?))
}
