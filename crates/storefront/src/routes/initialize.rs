//! Reset endpoint used between benchmark runs.

use axum::extract::State;

use crate::error::Result;
use crate::services::reset_to_seed;
use crate::state::AppState;

/// Delete everything above the seed thresholds and answer `Finish`.
///
/// Cached pages and profiles are kept.
pub async fn initialize(State(state): State<AppState>) -> Result<&'static str> {
    reset_to_seed(state.pool()).await?;
    Ok("Finish")
}
