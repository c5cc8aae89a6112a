//! Payment repository: report fee transactions.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use yaracheck_core::payment::{PaymentStatus, Provider};
use yaracheck_core::report::{ReportError, ReportKind, ReportStatus, ReportWorkflow};
use yaracheck_shared::AppError;
use yaracheck_shared::types::PageRequest;

use super::report::{lock_status, set_status};
use crate::entities::transactions;

/// Errors from payment persistence.
#[derive(Debug, Error)]
pub enum PaymentRepoError {
    /// Transaction or report not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The report cannot be activated from its current status.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<PaymentRepoError> for AppError {
    fn from(e: PaymentRepoError) -> Self {
        match e {
            PaymentRepoError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            PaymentRepoError::Report(report) => report.into(),
            PaymentRepoError::Database(db) => Self::Database(db.to_string()),
        }
    }
}

/// A checkout about to be recorded.
#[derive(Debug, Clone)]
pub struct NewPayment {
    /// Our reference, `YCP-...`.
    pub reference: String,
    /// Checkout provider.
    pub provider: Provider,
    /// Kind of the report being paid for.
    pub kind: ReportKind,
    /// ID of the report being paid for.
    pub report_id: Uuid,
    /// Paying user.
    pub user_id: Uuid,
    /// Fee in minor units.
    pub amount_cents: i64,
    /// ISO currency code.
    pub currency: String,
    /// Checkout page.
    pub checkout_url: String,
    /// Provider data needed for verification.
    pub provider_payload: Option<Value>,
}

/// Result of settling a payment.
#[derive(Debug, Clone)]
pub struct SettledPayment {
    /// The transaction row after settlement.
    pub transaction: transactions::Model,
    /// False when the payment had already been settled earlier.
    pub newly_settled: bool,
    /// True when this payment moved the report out of `pending_payment`.
    pub opened_report: bool,
}

/// Payment repository.
#[derive(Debug, Clone)]
pub struct PaymentRepository {
    db: Arc<DatabaseConnection>,
}

impl PaymentRepository {
    /// Creates a new payment repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Records an opened checkout as a pending transaction.
    pub async fn create_pending(&self, input: NewPayment) -> Result<transactions::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let transaction = transactions::ActiveModel {
            id: Set(Uuid::now_v7()),
            reference: Set(input.reference),
            provider: Set(input.provider.as_str().to_string()),
            report_kind: Set(input.kind.as_str().to_string()),
            report_id: Set(input.report_id),
            user_id: Set(input.user_id),
            amount_cents: Set(input.amount_cents),
            currency: Set(input.currency),
            status: Set(PaymentStatus::Pending.as_str().to_string()),
            checkout_url: Set(Some(input.checkout_url)),
            provider_payload: Set(input.provider_payload),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::info!(
            reference = %transaction.reference,
            provider = %transaction.provider,
            report_id = %transaction.report_id,
            amount_cents = transaction.amount_cents,
            "Payment initialized"
        );
        Ok(transaction)
    }

    /// Finds a transaction by reference.
    pub async fn find_by_reference(
        &self,
        reference: &str,
    ) -> Result<Option<transactions::Model>, DbErr> {
        transactions::Entity::find()
            .filter(transactions::Column::Reference.eq(reference.trim()))
            .one(self.db.as_ref())
            .await
    }

    /// Lists transactions, newest first.
    pub async fn list(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<transactions::Model>, u64), DbErr> {
        let paginator = transactions::Entity::find()
            .order_by_desc(transactions::Column::CreatedAt)
            .paginate(self.db.as_ref(), page.limit());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page() - 1)).await?;
        Ok((items, total))
    }

    /// Marks a payment successful and opens its report, atomically.
    ///
    /// Settling an already settled payment is a no-op. A payment for a report
    /// that another checkout already opened is still recorded as successful.
    pub async fn settle(
        &self,
        reference: &str,
        provider_payload: Value,
    ) -> Result<SettledPayment, PaymentRepoError> {
        let txn = self.db.begin().await?;

        let transaction = transactions::Entity::find()
            .filter(transactions::Column::Reference.eq(reference))
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(PaymentRepoError::NotFound("Payment"))?;

        if transaction.status == PaymentStatus::Success.as_str() {
            return Ok(SettledPayment {
                transaction,
                newly_settled: false,
                opened_report: false,
            });
        }

        let kind = ReportKind::parse(&transaction.report_kind)
            .ok_or_else(|| ReportError::UnknownKind(transaction.report_kind.clone()))?;
        let current = lock_status(&txn, kind, transaction.report_id)
            .await?
            .ok_or(PaymentRepoError::NotFound("Report"))?;
        let opened_report = current == ReportStatus::PendingPayment;
        if opened_report {
            let next = ReportWorkflow::activate(current)?;
            set_status(&txn, kind, transaction.report_id, current, next).await?;
        } else {
            tracing::warn!(
                reference = %transaction.reference,
                report_id = %transaction.report_id,
                status = %current,
                "Report already paid for, recording extra payment"
            );
        }

        let mut active: transactions::ActiveModel = transaction.into();
        active.status = Set(PaymentStatus::Success.as_str().to_string());
        active.provider_payload = Set(Some(provider_payload));
        active.updated_at = Set(chrono::Utc::now().into());
        let transaction = active.update(&txn).await?;

        txn.commit().await?;
        tracing::info!(
            reference = %transaction.reference,
            report_id = %transaction.report_id,
            opened_report,
            "Payment settled"
        );
        Ok(SettledPayment {
            transaction,
            newly_settled: true,
            opened_report,
        })
    }

    /// Marks a pending payment as failed.
    pub async fn mark_failed(
        &self,
        reference: &str,
        provider_payload: Value,
    ) -> Result<Option<transactions::Model>, DbErr> {
        let Some(transaction) = self.find_by_reference(reference).await? else {
            return Ok(None);
        };
        if transaction.status != PaymentStatus::Pending.as_str() {
            return Ok(Some(transaction));
        }

        let mut active: transactions::ActiveModel = transaction.into();
        active.status = Set(PaymentStatus::Failed.as_str().to_string());
        active.provider_payload = Set(Some(provider_payload));
        active.updated_at = Set(chrono::Utc::now().into());
        let transaction = active.update(self.db.as_ref()).await?;

        tracing::warn!(reference = %transaction.reference, "Payment failed");
        Ok(Some(transaction))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use serde_json::json;
    use std::collections::BTreeMap;

    fn status_row(status: &str) -> BTreeMap<&'static str, sea_orm::Value> {
        BTreeMap::from([("status", sea_orm::Value::from(status.to_string()))])
    }

    fn transaction(status: &str) -> transactions::Model {
        let now = chrono::Utc::now().into();
        transactions::Model {
            id: Uuid::new_v4(),
            reference: "YCP-0123456789abcdef0123456789abcdef".to_string(),
            provider: "paystack".to_string(),
            report_kind: "device".to_string(),
            report_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            amount_cents: 600,
            currency: "USD".to_string(),
            status: status.to_string(),
            checkout_url: Some("https://checkout.paystack.com/abc".to_string()),
            provider_payload: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_settle_is_idempotent() {
        let paid = transaction("success");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![paid.clone()]])
            .into_connection();

        let settled = PaymentRepository::new(Arc::new(db))
            .settle(&paid.reference, json!({}))
            .await
            .unwrap();
        assert!(!settled.newly_settled);
        assert_eq!(settled.transaction, paid);
    }

    #[tokio::test]
    async fn test_settle_unknown_reference() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<transactions::Model>::new()])
            .into_connection();

        let err = PaymentRepository::new(Arc::new(db))
            .settle("YCP-missing", json!({}))
            .await
            .unwrap_err();
        assert!(matches!(err, PaymentRepoError::NotFound("Payment")));
    }

    #[tokio::test]
    async fn test_mark_failed_leaves_settled_payment_alone() {
        let paid = transaction("success");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![paid.clone()]])
            .into_connection();

        let result = PaymentRepository::new(Arc::new(db))
            .mark_failed(&paid.reference, json!({"status": false}))
            .await
            .unwrap();
        assert_eq!(result, Some(paid));
    }

    #[tokio::test]
    async fn test_settle_opens_pending_report() {
        let pending = transaction("pending");
        let mut paid = pending.clone();
        paid.status = "success".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending.clone()]])
            .append_query_results([vec![status_row("pending_payment")]])
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .append_query_results([vec![paid]])
            .into_connection();

        let settled = PaymentRepository::new(Arc::new(db))
            .settle(&pending.reference, json!({"data": {"status": "success"}}))
            .await
            .unwrap();
        assert!(settled.newly_settled);
        assert!(settled.opened_report);
        assert_eq!(settled.transaction.status, "success");
    }

    #[tokio::test]
    async fn test_second_checkout_for_open_report_is_still_recorded() {
        let pending = transaction("pending");
        let mut paid = pending.clone();
        paid.status = "success".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![pending.clone()]])
            .append_query_results([vec![status_row("open")]])
            .append_query_results([vec![paid]])
            .into_connection();

        let settled = PaymentRepository::new(Arc::new(db))
            .settle(&pending.reference, json!({"data": {"status": "success"}}))
            .await
            .unwrap();
        assert!(settled.newly_settled);
        assert!(!settled.opened_report);
        assert_eq!(settled.transaction.status, "success");
    }
}
