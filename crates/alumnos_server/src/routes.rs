//! Route table and handlers for `/api/alumnos`.
//!
//! # Responsibility
//! - Extract path ids and JSON bodies and forward them to the service.
//! - Map service results to status codes and bodies.
//!
//! # Invariants
//! - Handlers hold no state of their own; every read re-queries the store.

use crate::error::ApiError;
use crate::state::AppState;
use alumnos_core::service::alumno_service::MSG_DELETED;
use alumnos_core::{Alumno, AlumnoCandidate};
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::{Json, Router};
use log::info;
use serde_json::{json, Value};
use std::time::Instant;
use tower_http::cors::CorsLayer;

/// Builds the application router around injected state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/alumnos",
            get(list_alumnos).post(create_alumno).put(update_alumno),
        )
        .route("/api/alumnos/{id}", get(get_alumno).delete(delete_alumno))
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn list_alumnos(State(state): State<AppState>) -> Result<Json<Vec<Alumno>>, ApiError> {
    let alumnos = state.with_service(|service| service.list_alumnos()).await?;
    Ok(Json(alumnos))
}

async fn get_alumno(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Alumno>, ApiError> {
    let Path(raw_id) = path?;
    let alumno = state
        .with_service(move |service| service.get_alumno(&raw_id))
        .await?;
    Ok(Json(alumno))
}

async fn create_alumno(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Alumno>), ApiError> {
    let Json(body) = body?;
    let candidate = AlumnoCandidate::from_json(body);
    let created = state
        .with_service(move |service| service.create_alumno(&candidate))
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_alumno(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Alumno>, ApiError> {
    let Json(body) = body?;
    let candidate = AlumnoCandidate::from_json(body);
    let updated = state
        .with_service(move |service| service.update_alumno(&candidate))
        .await?;
    Ok(Json(updated))
}

async fn delete_alumno(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(raw_id) = path?;
    state
        .with_service(move |service| service.delete_alumno(&raw_id))
        .await?;
    Ok(Json(json!({ "message": MSG_DELETED })))
}

async fn log_requests(request: Request, next: Next) -> Response {
    let started_at = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    info!(
        "event=http_request module=http status=ok method={} path={} http_status={} duration_ms={}",
        method,
        path,
        response.status().as_u16(),
        started_at.elapsed().as_millis()
    );
    response
}
