use axum::extract::{Path, State};
use axum::response::Json;
use axum::Form;
use hb_protocol::{HashForm, HashIdResponse, HashResponse, StatsResponse};
use hb_types::HashId;

use crate::error::{ServerError, ServerResult};
use crate::state::AppState;

/// `POST /hash`: queue a payload and return its id.
pub async fn hash_post(
    State(state): State<AppState>,
    Form(form): Form<HashForm>,
) -> ServerResult<Json<HashIdResponse>> {
    if form.password.is_empty() {
        return Err(ServerError::MissingPayload);
    }
    let id = state.store.put(form.password)?;
    Ok(Json(HashIdResponse { id }))
}

/// `GET /hash/{id}`: the base64 digest once it is visible.
pub async fn hash_get(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ServerResult<Json<HashResponse>> {
    let id: HashId = raw_id.parse().map_err(|_| ServerError::NotFound)?;
    let entry = state.store.get(id).await.ok_or(ServerError::NotFound)?;
    Ok(Json(HashResponse::from(&entry)))
}

/// `GET /stats`.
pub async fn stats_get(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.store.stats()))
}

/// `POST /shutdown`: ask the server to stop. The store drains afterwards.
pub async fn shutdown_post(State(state): State<AppState>) -> &'static str {
    tracing::info!("shutdown requested over HTTP");
    state.shutdown.notify_one();
    "Shutting down the server.\n"
}
