//! Route registration

use super::auth::authn_middleware;
use super::dto::HealthResponse;
use super::handlers::{
    bunkering, cargo, clients, communications, documents, invoices, pms, recruitment, ships,
    users, work_logs,
};
use crate::domain::{AuthGate, FleetServices};
use axum::{
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Register all REST routes; everything except `/health` sits behind the auth gate
pub fn register_routes(router: Router, services: FleetServices, gate: Arc<AuthGate>) -> Router {
    let protected = Router::new()
        // Users
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/me", get(users::me))
        .route("/users/ship/{ship_id}", get(users::list_users_by_ship))
        .route(
            "/users/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        // Ships
        .route("/ships", get(ships::list_ships).post(ships::create_ship))
        .route(
            "/ships/{id}",
            get(ships::get_ship)
                .put(ships::update_ship)
                .delete(ships::delete_ship),
        )
        // Planned maintenance
        .route("/pms", get(pms::list_tasks).post(pms::create_task))
        .route("/pms/ship/{ship_id}/stats", get(pms::ship_task_stats))
        .route(
            "/pms/{id}",
            get(pms::get_task)
                .put(pms::update_task)
                .delete(pms::delete_task),
        )
        .route("/pms/{id}/approve", post(pms::approve_task))
        .route("/pms/{id}/reject", post(pms::reject_task))
        // Work logs
        .route(
            "/worklogs",
            get(work_logs::list_work_logs).post(work_logs::create_work_log),
        )
        .route(
            "/worklogs/{id}",
            get(work_logs::get_work_log)
                .put(work_logs::update_work_log)
                .delete(work_logs::delete_work_log),
        )
        .route("/worklogs/{id}/approve", post(work_logs::approve_work_log))
        .route("/worklogs/{id}/reject", post(work_logs::reject_work_log))
        // Invoices
        .route(
            "/invoices",
            get(invoices::list_invoices).post(invoices::create_invoice),
        )
        .route("/invoices/stats", get(invoices::invoice_stats))
        .route(
            "/invoices/{id}",
            get(invoices::get_invoice)
                .put(invoices::update_invoice)
                .delete(invoices::delete_invoice),
        )
        .route("/invoices/{id}/submit", post(invoices::submit_invoice))
        .route("/invoices/{id}/approve", post(invoices::approve_invoice))
        .route("/invoices/{id}/reject", post(invoices::reject_invoice))
        .route("/invoices/{id}/mark-paid", post(invoices::mark_invoice_paid))
        // Bunkering
        .route(
            "/bunkering",
            get(bunkering::list_bunkering).post(bunkering::create_bunkering),
        )
        .route(
            "/bunkering/{id}",
            get(bunkering::get_bunkering)
                .put(bunkering::update_bunkering)
                .delete(bunkering::delete_bunkering),
        )
        .route(
            "/bunkering/{id}/complete-checklist",
            post(bunkering::complete_checklist),
        )
        .route(
            "/bunkering/{id}/sample-taken",
            post(bunkering::mark_sample_taken),
        )
        // Cargo
        .route("/cargo", get(cargo::list_cargo).post(cargo::create_cargo))
        .route(
            "/cargo/{id}",
            get(cargo::get_cargo).put(cargo::update_cargo),
        )
        // Recruitment
        .route(
            "/recruitment/candidates",
            get(recruitment::list_candidates).post(recruitment::create_candidate),
        )
        .route(
            "/recruitment/candidates/{id}",
            get(recruitment::get_candidate)
                .put(recruitment::update_candidate)
                .delete(recruitment::delete_candidate),
        )
        .route(
            "/recruitment/candidates/{id}/stage",
            axum::routing::put(recruitment::set_candidate_stage),
        )
        // DG communications
        .route(
            "/dg-communications",
            get(communications::list_communications).post(communications::create_communication),
        )
        .route(
            "/dg-communications/stats",
            get(communications::communication_stats),
        )
        .route(
            "/dg-communications/{id}",
            get(communications::get_communication)
                .put(communications::update_communication)
                .delete(communications::delete_communication),
        )
        .route(
            "/dg-communications/{id}/respond",
            post(communications::respond_to_communication),
        )
        .route(
            "/dg-communications/{id}/complete",
            post(communications::complete_communication),
        )
        // Clients
        .route("/clients", get(clients::list_clients).post(clients::create_client))
        .route("/clients/stats", get(clients::client_stats))
        .route(
            "/clients/{id}",
            get(clients::get_client)
                .put(clients::update_client)
                .delete(clients::delete_client),
        )
        // Documents
        .route(
            "/documents/manuals",
            get(documents::list_manuals).post(documents::create_manual),
        )
        .route(
            "/documents/manuals/{id}",
            get(documents::get_manual).delete(documents::delete_manual),
        )
        .route(
            "/documents/templates",
            get(documents::list_templates).post(documents::create_template),
        )
        .route(
            "/documents/templates/{id}",
            get(documents::get_template).delete(documents::delete_template),
        )
        .route("/documents/trigger-work", post(documents::trigger_work))
        .route("/documents/submissions", get(documents::list_submissions))
        .route(
            "/documents/submissions/{id}",
            get(documents::get_submission).put(documents::update_submission),
        )
        .route(
            "/documents/submissions/{id}/approve",
            post(documents::approve_submission),
        )
        .route(
            "/documents/submissions/{id}/reject",
            post(documents::reject_submission),
        )
        .route_layer(middleware::from_fn_with_state(gate, authn_middleware))
        .layer(Extension(services));

    router
        .route("/health", get(health))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "healthy" })
}
