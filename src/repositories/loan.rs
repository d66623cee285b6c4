//! Loan repository
//!
//! Loans are advances to collaborators. Recording a payment inserts the
//! payment row and lowers the loan balance in one transaction.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
    entity::prelude::{DateTimeWithTimeZone, Expr},
};
use uuid::Uuid;

use super::{CollaboratorRepository, optional_text, positive};
use crate::error::RepositoryError;
use crate::models::loan::{self, Entity as Loan, LoanStatus};
use crate::models::loan_payment::{self, Entity as LoanPayment};

/// Amounts closer than this are treated as equal when settling a balance.
const BALANCE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone)]
pub struct NewLoan {
    pub collaborator_id: Uuid,
    pub amount: f64,
    pub reason: Option<String>,
    pub issued_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct NewLoanPayment {
    pub amount: f64,
    pub paid_at: Option<DateTime<Utc>>,
}

pub struct LoanRepository<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> LoanRepository<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        tenant_id: Uuid,
        input: NewLoan,
    ) -> Result<loan::Model, RepositoryError> {
        let amount = positive("amount", input.amount)?;

        let collaborator = CollaboratorRepository::new(self.db)
            .get(tenant_id, input.collaborator_id)
            .await?
            .ok_or_else(|| {
                RepositoryError::validation_error(format!(
                    "collaborator {} does not exist",
                    input.collaborator_id
                ))
            })?;
        if !collaborator.active {
            return Err(RepositoryError::validation_error(
                "loans can only be issued to active collaborators",
            ));
        }

        let now = Utc::now();
        let loan = loan::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            collaborator_id: Set(collaborator.id),
            amount: Set(amount),
            balance: Set(amount),
            reason: Set(optional_text(input.reason)),
            issued_at: Set(input.issued_at.unwrap_or(now).into()),
            status: Set(LoanStatus::Active),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        loan.insert(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn get(
        &self,
        tenant_id: Uuid,
        id: Uuid,
    ) -> Result<Option<loan::Model>, RepositoryError> {
        Loan::find_by_id(id)
            .filter(loan::Column::TenantId.eq(tenant_id))
            .one(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    pub async fn list(&self, tenant_id: Uuid) -> Result<Vec<loan::Model>, RepositoryError> {
        Loan::find()
            .filter(loan::Column::TenantId.eq(tenant_id))
            .order_by_desc(loan::Column::IssuedAt)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }

    /// Apply a payment to an active loan.
    ///
    /// Payments above the outstanding balance are rejected. A payment that
    /// settles the balance marks the loan as paid.
    pub async fn record_payment(
        &self,
        tenant_id: Uuid,
        loan_id: Uuid,
        input: NewLoanPayment,
    ) -> Result<(loan::Model, loan_payment::Model), RepositoryError> {
        let amount = positive("amount", input.amount)?;
        let txn = self
            .db
            .begin()
            .await
            .map_err(RepositoryError::database_error)?;

        // FOR UPDATE on Postgres; concurrent payments queue on the loan row.
        let loan = Loan::find_by_id(loan_id)
            .filter(loan::Column::TenantId.eq(tenant_id))
            .lock_exclusive()
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::not_found(format!("Loan {loan_id} not found")))?;

        if loan.status == LoanStatus::Paid {
            return Err(RepositoryError::validation_error("loan is already paid"));
        }

        let now: DateTimeWithTimeZone = Utc::now().into();
        if !debit_balance(&txn, tenant_id, loan.id, amount, now).await? {
            return Err(RepositoryError::validation_error(format!(
                "payment of {amount} exceeds outstanding balance of {}",
                loan.balance
            )));
        }

        let payment = loan_payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            tenant_id: Set(tenant_id),
            loan_id: Set(loan.id),
            amount: Set(amount),
            paid_at: Set(input.paid_at.map(Into::into).unwrap_or(now)),
            created_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(RepositoryError::database_error)?;

        let loan = Loan::find_by_id(loan.id)
            .one(&txn)
            .await
            .map_err(RepositoryError::database_error)?
            .ok_or_else(|| RepositoryError::not_found(format!("Loan {loan_id} not found")))?;

        let loan = if loan.balance <= BALANCE_EPSILON {
            let mut settled = loan.into_active_model();
            settled.balance = Set(0.0);
            settled.status = Set(LoanStatus::Paid);
            settled
                .update(&txn)
                .await
                .map_err(RepositoryError::database_error)?
        } else {
            loan
        };

        txn.commit()
            .await
            .map_err(RepositoryError::database_error)?;

        tracing::info!(
            tenant_id = %tenant_id,
            loan_id = %loan.id,
            amount,
            balance = loan.balance,
            "Loan payment recorded"
        );

        Ok((loan, payment))
    }

    pub async fn list_payments(
        &self,
        tenant_id: Uuid,
        loan_id: Uuid,
    ) -> Result<Vec<loan_payment::Model>, RepositoryError> {
        if self.get(tenant_id, loan_id).await?.is_none() {
            return Err(RepositoryError::not_found(format!(
                "Loan {loan_id} not found"
            )));
        }

        LoanPayment::find()
            .filter(loan_payment::Column::TenantId.eq(tenant_id))
            .filter(loan_payment::Column::LoanId.eq(loan_id))
            .order_by_asc(loan_payment::Column::PaidAt)
            .all(self.db)
            .await
            .map_err(RepositoryError::database_error)
    }
}

/// Lowers the balance of an active loan by `amount` unless that would take it
/// below zero. The check and the write are one statement, so a balance read
/// earlier in the transaction can never be overdrawn. Returns whether the
/// loan was debited.
async fn debit_balance<C: ConnectionTrait>(
    conn: &C,
    tenant_id: Uuid,
    loan_id: Uuid,
    amount: f64,
    now: DateTimeWithTimeZone,
) -> Result<bool, RepositoryError> {
    let result = Loan::update_many()
        .col_expr(
            loan::Column::Balance,
            Expr::col(loan::Column::Balance).sub(amount),
        )
        .col_expr(loan::Column::UpdatedAt, Expr::value(now))
        .filter(loan::Column::Id.eq(loan_id))
        .filter(loan::Column::TenantId.eq(tenant_id))
        .filter(loan::Column::Status.eq(LoanStatus::Active))
        .filter(loan::Column::Balance.gte(amount - BALANCE_EPSILON))
        .exec(conn)
        .await
        .map_err(RepositoryError::database_error)?;

    Ok(result.rows_affected == 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::{create_tenant, setup_test_db};
    use crate::repositories::{CollaboratorChanges, NewCollaborator};

    async fn seed_loan(db: &DatabaseConnection, amount: f64) -> (Uuid, loan::Model) {
        let tenant = create_tenant(db, "Zycle").await;
        let collaborator = CollaboratorRepository::new(db)
            .create(
                tenant,
                NewCollaborator {
                    full_name: "Carlos Ruiz".to_string(),
                    document_id: "94000222".to_string(),
                    role: "Conductor".to_string(),
                    phone: None,
                    email: None,
                },
            )
            .await
            .unwrap();

        let loan = LoanRepository::new(db)
            .create(
                tenant,
                NewLoan {
                    collaborator_id: collaborator.id,
                    amount,
                    reason: Some("Calamidad doméstica".to_string()),
                    issued_at: None,
                },
            )
            .await
            .unwrap();
        (tenant, loan)
    }

    fn pay(amount: f64) -> NewLoanPayment {
        NewLoanPayment {
            amount,
            paid_at: None,
        }
    }

    #[tokio::test]
    async fn partial_payment_reduces_balance() {
        let db = setup_test_db().await;
        let (tenant, loan) = seed_loan(&db, 300_000.0).await;
        let repo = LoanRepository::new(&db);

        let (loan, payment) = repo
            .record_payment(tenant, loan.id, pay(100_000.0))
            .await
            .unwrap();

        assert_eq!(loan.balance, 200_000.0);
        assert_eq!(loan.status, LoanStatus::Active);
        assert_eq!(payment.loan_id, loan.id);
        assert_eq!(repo.list_payments(tenant, loan.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn exact_payment_marks_loan_paid() {
        let db = setup_test_db().await;
        let (tenant, loan) = seed_loan(&db, 50_000.0).await;
        let repo = LoanRepository::new(&db);

        repo.record_payment(tenant, loan.id, pay(20_000.0))
            .await
            .unwrap();
        let (loan, _) = repo
            .record_payment(tenant, loan.id, pay(30_000.0))
            .await
            .unwrap();

        assert_eq!(loan.balance, 0.0);
        assert_eq!(loan.status, LoanStatus::Paid);

        let again = repo.record_payment(tenant, loan.id, pay(1.0)).await;
        assert!(matches!(again, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn overpayment_is_rejected_without_side_effects() {
        let db = setup_test_db().await;
        let (tenant, loan) = seed_loan(&db, 10_000.0).await;
        let repo = LoanRepository::new(&db);

        let result = repo.record_payment(tenant, loan.id, pay(10_000.5)).await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));

        let unchanged = repo.get(tenant, loan.id).await.unwrap().unwrap();
        assert_eq!(unchanged.balance, 10_000.0);
        assert!(repo.list_payments(tenant, loan.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn inactive_collaborator_cannot_borrow() {
        let db = setup_test_db().await;
        let (tenant, loan) = seed_loan(&db, 1_000.0).await;
        CollaboratorRepository::new(&db)
            .update(
                tenant,
                loan.collaborator_id,
                CollaboratorChanges {
                    active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let result = LoanRepository::new(&db)
            .create(
                tenant,
                NewLoan {
                    collaborator_id: loan.collaborator_id,
                    amount: 500.0,
                    reason: None,
                    issued_at: None,
                },
            )
            .await;
        assert!(matches!(result, Err(RepositoryError::Validation(_))));
    }

    #[tokio::test]
    async fn payments_of_foreign_loan_are_not_found() {
        let db = setup_test_db().await;
        let (_, loan) = seed_loan(&db, 1_000.0).await;
        let stranger = create_tenant(&db, "Stranger").await;
        let repo = LoanRepository::new(&db);

        assert!(matches!(
            repo.record_payment(stranger, loan.id, pay(10.0)).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(matches!(
            repo.list_payments(stranger, loan.id).await,
            Err(RepositoryError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn debit_refuses_a_balance_lowered_after_it_was_read() {
        let db = setup_test_db().await;
        let (tenant, loan) = seed_loan(&db, 100.0).await;
        let now: DateTimeWithTimeZone = Utc::now().into();

        // Both callers saw a balance of 100; only the first debit fits.
        assert!(debit_balance(&db, tenant, loan.id, 60.0, now).await.unwrap());
        assert!(!debit_balance(&db, tenant, loan.id, 60.0, now).await.unwrap());

        let current = LoanRepository::new(&db)
            .get(tenant, loan.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(current.balance, 40.0);
    }

    #[tokio::test]
    async fn concurrent_payments_never_exceed_the_loan() {
        let db = setup_test_db().await;
        let (tenant, loan) = seed_loan(&db, 100.0).await;
        let repo = LoanRepository::new(&db);

        let (first, second) = tokio::join!(
            repo.record_payment(tenant, loan.id, pay(60.0)),
            repo.record_payment(tenant, loan.id, pay(60.0)),
        );
        let outcomes = [first, second];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(
            outcomes
                .iter()
                .any(|r| matches!(r, Err(RepositoryError::Validation(_))))
        );

        let paid: f64 = repo
            .list_payments(tenant, loan.id)
            .await
            .unwrap()
            .iter()
            .map(|payment| payment.amount)
            .sum();
        let current = repo.get(tenant, loan.id).await.unwrap().unwrap();
        assert_eq!(paid, 60.0);
        assert_eq!(current.balance, 40.0);
        assert_eq!(current.status, LoanStatus::Active);
    }
}
