//! GET /get — dispense the next entry of the current cycle.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use wordcycle_core::VocabularyEntry;

use crate::error::AppError;
use crate::router::AppState;

#[derive(Debug, Serialize)]
pub struct NextWordResponse {
    pub success: bool,
    pub remaining_unique: usize,
    pub data: VocabularyEntry,
}

pub async fn next_word(State(state): State<AppState>) -> Result<Json<NextWordResponse>, AppError> {
    let draw = state.sampler.next().await?;
    tracing::debug!(
        term = draw.entry.term(),
        remaining = draw.remaining,
        backend = state.sampler.backend(),
        "dispensed"
    );
    Ok(Json(NextWordResponse {
        success: true,
        remaining_unique: draw.remaining,
        data: draw.entry,
    }))
}
