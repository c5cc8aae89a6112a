//! ROI repository: distributions and withdrawal requests.

use std::sync::Arc;

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use thiserror::Error;
use uuid::Uuid;

use yaracheck_core::roi::{DistributionInput, RoiError, RoiService, WithdrawalStatus};
use yaracheck_shared::AppError;

use crate::entities::{roi_distributions, roi_withdrawal_requests};

/// Errors from ROI persistence.
#[derive(Debug, Error)]
pub enum RoiRepoError {
    /// Distribution or withdrawal request not found.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// A distribution or withdrawal rule was violated.
    #[error(transparent)]
    Rule(#[from] RoiError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<RoiRepoError> for AppError {
    fn from(e: RoiRepoError) -> Self {
        match e {
            RoiRepoError::NotFound(what) => Self::NotFound(format!("{what} not found")),
            RoiRepoError::Rule(rule) => rule.into(),
            RoiRepoError::Database(db) => Self::Database(db.to_string()),
        }
    }
}

/// ROI repository.
#[derive(Debug, Clone)]
pub struct RoiRepository {
    db: Arc<DatabaseConnection>,
}

impl RoiRepository {
    /// Creates a new ROI repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Validates and stores a distribution. New distributions start disabled.
    pub async fn create_distribution(
        &self,
        input: &DistributionInput,
        created_by: Uuid,
    ) -> Result<roi_distributions::Model, RoiRepoError> {
        let amount = RoiService::validate_distribution(input)?;
        let now = chrono::Utc::now().into();

        let distribution = roi_distributions::ActiveModel {
            id: Set(Uuid::now_v7()),
            shareholder_id: Set(input.shareholder_id.into_inner()),
            pool_amount: Set(input.pool_amount),
            percentage: Set(input.percentage),
            amount: Set(amount),
            period_start: Set(input.period_start),
            period_end: Set(input.period_end),
            enabled: Set(false),
            notes: Set(input.notes.clone()),
            created_by: Set(created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::info!(
            distribution_id = %distribution.id,
            shareholder_id = %distribution.shareholder_id,
            amount = %amount,
            "ROI distribution created"
        );
        Ok(distribution)
    }

    /// Lists distributions, newest first, optionally for one shareholder.
    pub async fn list_distributions(
        &self,
        shareholder_id: Option<Uuid>,
    ) -> Result<Vec<roi_distributions::Model>, DbErr> {
        let mut query =
            roi_distributions::Entity::find().order_by_desc(roi_distributions::Column::CreatedAt);
        if let Some(shareholder_id) = shareholder_id {
            query = query.filter(roi_distributions::Column::ShareholderId.eq(shareholder_id));
        }
        query.all(self.db.as_ref()).await
    }

    /// Finds a distribution by ID.
    pub async fn find_distribution(
        &self,
        id: Uuid,
    ) -> Result<Option<roi_distributions::Model>, DbErr> {
        roi_distributions::Entity::find_by_id(id).one(self.db.as_ref()).await
    }

    /// Opens or closes a distribution for withdrawals.
    pub async fn set_enabled(
        &self,
        id: Uuid,
        enabled: bool,
    ) -> Result<roi_distributions::Model, RoiRepoError> {
        let distribution = self
            .find_distribution(id)
            .await?
            .ok_or(RoiRepoError::NotFound("Distribution"))?;

        let mut active: roi_distributions::ActiveModel = distribution.into();
        active.enabled = Set(enabled);
        active.updated_at = Set(chrono::Utc::now().into());
        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Deletes a distribution and its withdrawal requests atomically.
    pub async fn delete_distribution(&self, id: Uuid) -> Result<(), RoiRepoError> {
        let txn = self.db.begin().await?;

        let removed = roi_withdrawal_requests::Entity::delete_many()
            .filter(roi_withdrawal_requests::Column::DistributionId.eq(id))
            .exec(&txn)
            .await?
            .rows_affected;
        let deleted = roi_distributions::Entity::delete_by_id(id)
            .exec(&txn)
            .await?
            .rows_affected;
        if deleted == 0 {
            // Dropping the transaction rolls back.
            return Err(RoiRepoError::NotFound("Distribution"));
        }

        txn.commit().await?;
        tracing::info!(distribution_id = %id, withdrawals = removed, "ROI distribution deleted");
        Ok(())
    }

    /// Files a withdrawal request against the caller's own distribution.
    ///
    /// The distribution row is locked while the balance is checked, so two
    /// concurrent requests cannot both spend the same balance.
    pub async fn create_withdrawal(
        &self,
        distribution_id: Uuid,
        shareholder_id: Uuid,
        amount: Decimal,
    ) -> Result<roi_withdrawal_requests::Model, RoiRepoError> {
        let txn = self.db.begin().await?;

        let distribution = roi_distributions::Entity::find_by_id(distribution_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .filter(|d| d.shareholder_id == shareholder_id)
            .ok_or(RoiRepoError::NotFound("Distribution"))?;

        let existing: Vec<Decimal> = roi_withdrawal_requests::Entity::find()
            .filter(roi_withdrawal_requests::Column::DistributionId.eq(distribution_id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|w| w.amount)
            .collect();

        RoiService::validate_withdrawal(
            distribution.enabled,
            distribution.amount,
            &existing,
            amount,
        )?;

        let now = chrono::Utc::now().into();
        let request = roi_withdrawal_requests::ActiveModel {
            id: Set(Uuid::now_v7()),
            distribution_id: Set(distribution_id),
            shareholder_id: Set(shareholder_id),
            amount: Set(amount),
            status: Set(WithdrawalStatus::Pending.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::info!(
            withdrawal_id = %request.id,
            distribution_id = %distribution_id,
            amount = %amount,
            "Withdrawal requested"
        );
        Ok(request)
    }

    /// Lists withdrawal requests, newest first, optionally for one shareholder.
    pub async fn list_withdrawals(
        &self,
        shareholder_id: Option<Uuid>,
    ) -> Result<Vec<roi_withdrawal_requests::Model>, DbErr> {
        let mut query = roi_withdrawal_requests::Entity::find()
            .order_by_desc(roi_withdrawal_requests::Column::CreatedAt);
        if let Some(shareholder_id) = shareholder_id {
            query = query.filter(roi_withdrawal_requests::Column::ShareholderId.eq(shareholder_id));
        }
        query.all(self.db.as_ref()).await
    }

    /// Moves a withdrawal request one step along its lifecycle.
    pub async fn advance_withdrawal(
        &self,
        id: Uuid,
    ) -> Result<roi_withdrawal_requests::Model, RoiRepoError> {
        let request = roi_withdrawal_requests::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(RoiRepoError::NotFound("Withdrawal request"))?;

        let current = WithdrawalStatus::parse(&request.status).ok_or_else(|| {
            DbErr::Type(format!("unknown withdrawal status '{}'", request.status))
        })?;
        let next = RoiService::advance(current)?;

        let mut active: roi_withdrawal_requests::ActiveModel = request.into();
        active.status = Set(next.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now().into());
        let updated = active.update(self.db.as_ref()).await?;

        tracing::info!(withdrawal_id = %id, from = %current, to = %next, "Withdrawal advanced");
        Ok(updated)
    }
}
