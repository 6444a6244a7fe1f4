use axum::{extract::State, Extension, Json};

use mbrief_engine::{EngineError, QueryRequest, QueryResponse};

use crate::middleware::RequestId;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};

pub(super) async fn run_query(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(request): Json<QueryRequest>,
) -> Result<Json<ApiResponse<QueryResponse>>, ApiError> {
    let data = mbrief_engine::handle_query(&state.ctx, &request)
        .await
        .map_err(|e| map_engine_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

fn map_engine_error(request_id: String, error: &EngineError) -> ApiError {
    match error {
        EngineError::InvalidQuery(message) => {
            ApiError::new(request_id, "validation_error", message.clone())
        }
        EngineError::Retrieval { .. } => {
            tracing::error!(error = %error, "retrieval failed on both lookup paths");
            ApiError::new(request_id, "internal_error", "search failed")
        }
    }
}
