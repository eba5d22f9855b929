//! # Corridor Operations Routes
//!
//! Routes for corridor proposal and lifecycle transitions, backed by
//! `msez_state::corridor::DynCorridor` rather than the typestate API —
//! over HTTP the current state is only known at request time.

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use msez_core::{CorridorId, JurisdictionId, Timestamp};
use msez_state::corridor::{DynCorridor, DynCorridorState};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppError, AppState};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/corridors", post(propose))
        .route("/v1/corridors/{corridor_id}", get(get_corridor))
        .route("/v1/corridors/{corridor_id}/transition", post(transition))
}

#[derive(Debug, Deserialize)]
struct ProposeRequest {
    jurisdiction_a: String,
    jurisdiction_b: String,
}

async fn propose(
    State(state): State<AppState>,
    Json(req): Json<ProposeRequest>,
) -> Result<Json<DynCorridor>, AppError> {
    let corridor = DynCorridor {
        id: CorridorId::new(),
        jurisdiction_a: JurisdictionId::new(req.jurisdiction_a),
        jurisdiction_b: JurisdictionId::new(req.jurisdiction_b),
        created_at: Timestamp::now(),
        state: DynCorridorState::Draft,
        transition_log: Vec::new(),
    };
    state.corridors.write().await.insert(corridor.id.clone(), corridor.clone());
    Ok(Json(corridor))
}

async fn get_corridor(
    State(state): State<AppState>,
    Path(corridor_id): Path<Uuid>,
) -> Result<Json<DynCorridor>, AppError> {
    let id = CorridorId(corridor_id);
    state
        .corridors
        .read()
        .await
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("corridor {id} not found")))
}

#[derive(Debug, Deserialize)]
struct TransitionRequest {
    to: DynCorridorState,
    reason: Option<String>,
}

#[derive(Debug, Serialize)]
struct TransitionResponse {
    corridor: DynCorridor,
}

async fn transition(
    State(state): State<AppState>,
    Path(corridor_id): Path<Uuid>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<TransitionResponse>, AppError> {
    let id = CorridorId(corridor_id);
    let mut corridors = state.corridors.write().await;
    let corridor = corridors
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("corridor {id} not found")))?;
    corridor
        .try_transition(req.to, None, req.reason)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(TransitionResponse { corridor: corridor.clone() }))
}
