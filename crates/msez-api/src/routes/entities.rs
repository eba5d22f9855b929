//! # Entity Lifecycle Routes
//!
//! Routes for entity registration and lifecycle transitions, backed by
//! `msez_state::entity::Entity`.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use msez_core::{sha256_bytes, ArtifactRef, EntityId, Timestamp};
use msez_state::entity::Entity;
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/entities", post(register))
        .route("/v1/entities/{entity_id}", get(get_entity))
        .route("/v1/entities/{entity_id}/activate", post(activate))
        .route("/v1/entities/{entity_id}/suspend", post(suspend))
        .route("/v1/entities/{entity_id}/resume", post(resume))
        .route("/v1/entities/{entity_id}/dissolution/advance", post(advance_dissolution))
        .route("/v1/entities/{entity_id}/dissolve", post(dissolve))
}

async fn register(State(state): State<AppState>) -> Json<Entity> {
    let entity = Entity::new(EntityId::new());
    state.entities.write().await.insert(entity.id.clone(), entity.clone());
    Json(entity)
}

async fn get_entity(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
) -> Result<Json<Entity>, AppError> {
    let id = EntityId(entity_id);
    state
        .entities
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("entity {id} not found")))
}

#[derive(Debug, Deserialize, Default)]
struct EvidenceRequest {
    #[serde(default)]
    note: String,
}

fn evidence_artifact(artifact_type: &str, note: &str) -> ArtifactRef {
    let digest = sha256_bytes(note.as_bytes());
    ArtifactRef::new(artifact_type, &digest)
}

async fn with_entity<F>(
    state: &AppState,
    entity_id: Uuid,
    f: F,
) -> Result<Json<Entity>, AppError>
where
    F: FnOnce(&mut Entity) -> Result<(), msez_state::entity::EntityError>,
{
    let id = EntityId(entity_id);
    let mut entities = state.entities.write().await;
    let entity = entities
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("entity {id} not found")))?;
    f(entity).map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(entity.clone()))
}

async fn activate(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
    Json(req): Json<EvidenceRequest>,
) -> Result<Json<Entity>, AppError> {
    let now = Timestamp::now();
    let record = evidence_artifact("MSEZEntityFormationRecord", &req.note);
    with_entity(&state, entity_id, |e| e.activate(record, now)).await
}

async fn suspend(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
    Json(req): Json<EvidenceRequest>,
) -> Result<Json<Entity>, AppError> {
    let now = Timestamp::now();
    let reason = req.note.clone();
    with_entity(&state, entity_id, move |e| e.suspend(reason, None, now)).await
}

async fn resume(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
    Json(req): Json<EvidenceRequest>,
) -> Result<Json<Entity>, AppError> {
    let now = Timestamp::now();
    let record = evidence_artifact("MSEZEntityResumptionRecord", &req.note);
    with_entity(&state, entity_id, |e| e.resume(record, now)).await
}

async fn advance_dissolution(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
    Json(req): Json<EvidenceRequest>,
) -> Result<Json<Entity>, AppError> {
    let now = Timestamp::now();
    let record = evidence_artifact("MSEZEntityDissolutionStageRecord", &req.note);
    with_entity(&state, entity_id, |e| e.advance_dissolution(record, now)).await
}

async fn dissolve(
    State(state): State<AppState>,
    Path(entity_id): Path<Uuid>,
    Json(req): Json<EvidenceRequest>,
) -> Result<Json<Entity>, AppError> {
    let now = Timestamp::now();
    let record = evidence_artifact("MSEZEntityClosingRecord", &req.note);
    with_entity(&state, entity_id, |e| e.dissolve(record, now)).await
}
