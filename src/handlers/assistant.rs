//! # ZIA Assistant Handler

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::assistant::{ChatTurn, ZiaFlow, ZiaInput, ZiaOutput};
use crate::auth::{OperatorAuth, TenantExtension, TenantHeader};
use crate::error::{ApiError, validation_error};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ZiaRequest {
    #[schema(example = "¿Qué material tengo con más existencias?")]
    pub query: String,
    /// Prior conversation turns, oldest first
    #[serde(default)]
    pub history: Vec<ChatTurn>,
}

/// Ask ZIA a question about the company's data
#[utoipa::path(
    post,
    path = "/api/v1/assistant/zia",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = ZiaRequest,
    responses(
        (status = 200, description = "Assistant answer", body = ZiaOutput),
        (status = 400, description = "Empty query", body = ApiError),
        (status = 401, description = "Missing or invalid bearer token", body = ApiError),
        (status = 502, description = "Generative model failed", body = ApiError),
        (status = 503, description = "Generative model not configured", body = ApiError)
    ),
    tag = "assistant"
)]
pub async fn ask_zia(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<ZiaRequest>, JsonRejection>,
) -> Result<Json<ZiaOutput>, ApiError> {
    let Json(request) = payload?;

    if request.query.trim().is_empty() {
        return Err(validation_error(
            "Query is required",
            json!({ "query": "Must not be empty" }),
        ));
    }

    let output = ZiaFlow::new(state.model.as_ref(), &state.db, &state.config.assistant)
        .run(ZiaInput {
            query: request.query,
            history: request.history,
            user_id: tenant.to_string(),
        })
        .await?;

    Ok(Json(output))
}
