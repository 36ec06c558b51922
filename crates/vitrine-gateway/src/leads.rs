//! `POST /api/v1/leads`: signup-modal submissions.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};
use vitrine_core::{LeadError, LeadForm};

use crate::AppState;

pub async fn submit_lead(
    State(state): State<AppState>,
    Json(form): Json<LeadForm>,
) -> Result<(StatusCode, Json<Value>), (StatusCode, String)> {
    match state.leads.submit(&form).await {
        Ok(receipt) => Ok((
            StatusCode::ACCEPTED,
            Json(json!({
                "status": "accepted",
                "lead_id": receipt.lead_id,
            })),
        )),
        Err(
            e @ (LeadError::MissingName | LeadError::InvalidEmail | LeadError::InvalidPhone),
        ) => Err((StatusCode::UNPROCESSABLE_ENTITY, e.to_string())),
        Err(e) => Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string())),
    }
}
