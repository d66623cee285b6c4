//! # PQS Handler

use axum::{
    extract::{State, rejection::JsonRejection},
    response::Json,
};
use serde_json::Value;

use crate::auth::{OperatorAuth, TenantExtension, TenantHeader};
use crate::error::{ApiError, validation_error};
use crate::pqs::{PqsFlow, PqsOutput, PqsSubmission};
use crate::server::AppState;

/// Submit a petition, complaint or suggestion
///
/// The model drafts an email body which is logged; nothing is delivered.
#[utoipa::path(
    post,
    path = "/api/v1/pqs",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = PqsSubmission,
    responses(
        (status = 200, description = "Submission accepted", body = PqsOutput),
        (status = 400, description = "Validation failed", body = ApiError),
        (status = 502, description = "Generative model failed", body = ApiError)
    ),
    tag = "pqs"
)]
pub async fn submit_pqs(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<PqsSubmission>, JsonRejection>,
) -> Result<Json<PqsOutput>, ApiError> {
    let Json(submission) = payload?;

    let problems = submission.problems();
    if !problems.is_empty() {
        return Err(validation_error(
            "Invalid PQS submission",
            Value::Object(problems),
        ));
    }

    tracing::debug!(tenant_id = %tenant, "PQS submission received");
    let output = PqsFlow::new(state.model.as_ref()).run(submission).await?;

    Ok(Json(output))
}
