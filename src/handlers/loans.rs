//! # Loan Handlers
//!
//! Loans to collaborators and the payments that settle them.

use axum::{
    extract::{Path, State, rejection::JsonRejection},
    response::Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::types::{Created, created, found};
use crate::auth::{OperatorAuth, TenantExtension, TenantHeader};
use crate::error::ApiError;
use crate::models::loan::{self, LoanStatus};
use crate::models::loan_payment;
use crate::repositories::{LoanRepository, NewLoan, NewLoanPayment};
use crate::server::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateLoanRequest {
    pub collaborator_id: Uuid,
    #[schema(example = 300000.0)]
    pub amount: f64,
    pub reason: Option<String>,
    /// Defaults to now
    pub issued_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoanResponse {
    pub id: Uuid,
    pub collaborator_id: Uuid,
    pub amount: f64,
    /// Outstanding amount
    pub balance: f64,
    pub reason: Option<String>,
    pub issued_at: String,
    pub status: LoanStatus,
    pub created_at: String,
    pub updated_at: String,
}

impl From<loan::Model> for LoanResponse {
    fn from(loan: loan::Model) -> Self {
        Self {
            id: loan.id,
            collaborator_id: loan.collaborator_id,
            amount: loan.amount,
            balance: loan.balance,
            reason: loan.reason,
            issued_at: loan.issued_at.to_rfc3339(),
            status: loan.status,
            created_at: loan.created_at.to_rfc3339(),
            updated_at: loan.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoansResponse {
    pub loans: Vec<LoanResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateLoanPaymentRequest {
    #[schema(example = 50000.0)]
    pub amount: f64,
    /// Defaults to now
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoanPaymentResponse {
    pub id: Uuid,
    pub loan_id: Uuid,
    pub amount: f64,
    pub paid_at: String,
}

impl From<loan_payment::Model> for LoanPaymentResponse {
    fn from(payment: loan_payment::Model) -> Self {
        Self {
            id: payment.id,
            loan_id: payment.loan_id,
            amount: payment.amount,
            paid_at: payment.paid_at.to_rfc3339(),
        }
    }
}

/// A recorded payment together with the loan it was applied to
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RecordedPaymentResponse {
    pub payment: LoanPaymentResponse,
    pub loan: LoanResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoanPaymentsResponse {
    pub payments: Vec<LoanPaymentResponse>,
}

/// Issue a loan to an active collaborator
#[utoipa::path(
    post,
    path = "/api/v1/loans",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    request_body = CreateLoanRequest,
    responses(
        (status = 201, description = "Loan created", body = LoanResponse),
        (status = 400, description = "Validation failed or unknown collaborator", body = ApiError)
    ),
    tag = "loans"
)]
pub async fn create_loan(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    payload: Result<Json<CreateLoanRequest>, JsonRejection>,
) -> Result<Created<LoanResponse>, ApiError> {
    let Json(request) = payload?;

    let loan = LoanRepository::new(&state.db)
        .create(
            tenant.as_uuid(),
            NewLoan {
                collaborator_id: request.collaborator_id,
                amount: request.amount,
                reason: request.reason,
                issued_at: request.issued_at,
            },
        )
        .await?;

    Ok(created(format!("/api/v1/loans/{}", loan.id), loan.into()))
}

#[utoipa::path(
    get,
    path = "/api/v1/loans",
    security(("bearer_auth" = [])),
    params(TenantHeader),
    responses(
        (status = 200, description = "Loans, most recent first", body = LoansResponse)
    ),
    tag = "loans"
)]
pub async fn list_loans(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
) -> Result<Json<LoansResponse>, ApiError> {
    let loans = LoanRepository::new(&state.db).list(tenant.as_uuid()).await?;

    Ok(Json(LoansResponse {
        loans: loans.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/v1/loans/{id}",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Loan UUID")),
    responses(
        (status = 200, description = "Loan found", body = LoanResponse),
        (status = 404, description = "Loan not found", body = ApiError)
    ),
    tag = "loans"
)]
pub async fn get_loan(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = LoanRepository::new(&state.db)
        .get(tenant.as_uuid(), id)
        .await?;

    Ok(Json(found(loan, "Loan", id)?.into()))
}

/// Record a payment against a loan
///
/// A payment larger than the outstanding balance is rejected; one that
/// settles it marks the loan as paid.
#[utoipa::path(
    post,
    path = "/api/v1/loans/{id}/payments",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Loan UUID")),
    request_body = CreateLoanPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = RecordedPaymentResponse),
        (status = 400, description = "Overpayment or loan already paid", body = ApiError),
        (status = 404, description = "Loan not found", body = ApiError)
    ),
    tag = "loans"
)]
pub async fn create_loan_payment(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
    payload: Result<Json<CreateLoanPaymentRequest>, JsonRejection>,
) -> Result<Created<RecordedPaymentResponse>, ApiError> {
    let Json(request) = payload?;

    let (loan, payment) = LoanRepository::new(&state.db)
        .record_payment(
            tenant.as_uuid(),
            id,
            NewLoanPayment {
                amount: request.amount,
                paid_at: request.paid_at,
            },
        )
        .await?;

    Ok(created(
        format!("/api/v1/loans/{}/payments", loan.id),
        RecordedPaymentResponse {
            payment: payment.into(),
            loan: loan.into(),
        },
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/loans/{id}/payments",
    security(("bearer_auth" = [])),
    params(TenantHeader, ("id" = Uuid, Path, description = "Loan UUID")),
    responses(
        (status = 200, description = "Payments, oldest first", body = LoanPaymentsResponse),
        (status = 404, description = "Loan not found", body = ApiError)
    ),
    tag = "loans"
)]
pub async fn list_loan_payments(
    State(state): State<AppState>,
    _operator_auth: OperatorAuth,
    TenantExtension(tenant): TenantExtension,
    Path(id): Path<Uuid>,
) -> Result<Json<LoanPaymentsResponse>, ApiError> {
    let payments = LoanRepository::new(&state.db)
        .list_payments(tenant.as_uuid(), id)
        .await?;

    Ok(Json(LoanPaymentsResponse {
        payments: payments.into_iter().map(Into::into).collect(),
    }))
}
