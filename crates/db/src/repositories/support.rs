//! Support tickets and anonymous messages.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use thiserror::Error;
use uuid::Uuid;

use yaracheck_core::support::{SupportError, TicketStatus, TicketWorkflow, validate_message};
use yaracheck_shared::AppError;
use yaracheck_shared::types::PageRequest;

use crate::entities::{anonymous_messages, support_tickets};

/// Errors from support persistence.
#[derive(Debug, Error)]
pub enum SupportRepoError {
    /// Ticket not found.
    #[error("Ticket not found")]
    NotFound,

    /// A ticket rule was violated.
    #[error(transparent)]
    Rule(#[from] SupportError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

impl From<SupportRepoError> for AppError {
    fn from(e: SupportRepoError) -> Self {
        match e {
            SupportRepoError::NotFound => Self::NotFound("Ticket not found".to_string()),
            SupportRepoError::Rule(rule) => rule.into(),
            SupportRepoError::Database(db) => Self::Database(db.to_string()),
        }
    }
}

/// Support repository.
#[derive(Debug, Clone)]
pub struct SupportRepository {
    db: Arc<DatabaseConnection>,
}

impl SupportRepository {
    /// Creates a new support repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Opens a ticket.
    pub async fn create_ticket(
        &self,
        user_id: Uuid,
        subject: &str,
        message: &str,
    ) -> Result<support_tickets::Model, SupportRepoError> {
        TicketWorkflow::validate_ticket(subject, message)?;

        let now = chrono::Utc::now().into();
        let ticket = support_tickets::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            subject: Set(subject.trim().to_string()),
            message: Set(message.trim().to_string()),
            status: Set(TicketStatus::Open.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::info!(ticket_id = %ticket.id, user_id = %user_id, "Support ticket opened");
        Ok(ticket)
    }

    /// Lists a user's tickets, newest first.
    pub async fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> Result<Vec<support_tickets::Model>, DbErr> {
        support_tickets::Entity::find()
            .filter(support_tickets::Column::UserId.eq(user_id))
            .order_by_desc(support_tickets::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
    }

    /// Lists all tickets, newest first, optionally by status.
    pub async fn list(
        &self,
        status: Option<TicketStatus>,
        page: &PageRequest,
    ) -> Result<(Vec<support_tickets::Model>, u64), DbErr> {
        let mut query =
            support_tickets::Entity::find().order_by_desc(support_tickets::Column::CreatedAt);
        if let Some(status) = status {
            query = query.filter(support_tickets::Column::Status.eq(status.as_str()));
        }

        let paginator = query.paginate(self.db.as_ref(), page.limit());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page() - 1)).await?;
        Ok((items, total))
    }

    /// Changes a ticket's status.
    pub async fn update_status(
        &self,
        id: Uuid,
        to: TicketStatus,
    ) -> Result<support_tickets::Model, SupportRepoError> {
        let ticket = support_tickets::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?
            .ok_or(SupportRepoError::NotFound)?;

        let from = TicketStatus::parse(&ticket.status)
            .ok_or_else(|| DbErr::Type(format!("unknown ticket status '{}'", ticket.status)))?;
        TicketWorkflow::transition(from, to)?;

        let mut active: support_tickets::ActiveModel = ticket.into();
        active.status = Set(to.as_str().to_string());
        active.updated_at = Set(chrono::Utc::now().into());
        let ticket = active.update(self.db.as_ref()).await?;

        tracing::info!(ticket_id = %id, from = %from, to = %to, "Support ticket updated");
        Ok(ticket)
    }

    /// Stores an anonymous message.
    pub async fn create_anonymous_message(
        &self,
        message: &str,
        contact: Option<&str>,
    ) -> Result<anonymous_messages::Model, SupportRepoError> {
        validate_message(message)?;

        let stored = anonymous_messages::ActiveModel {
            id: Set(Uuid::now_v7()),
            message: Set(message.trim().to_string()),
            contact: Set(contact
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string)),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await?;

        tracing::info!(message_id = %stored.id, "Anonymous message received");
        Ok(stored)
    }

    /// Lists anonymous messages, newest first.
    pub async fn list_anonymous_messages(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<anonymous_messages::Model>, u64), DbErr> {
        let paginator = anonymous_messages::Entity::find()
            .order_by_desc(anonymous_messages::Column::CreatedAt)
            .paginate(self.db.as_ref(), page.limit());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page() - 1)).await?;
        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn ticket(status: &str) -> support_tickets::Model {
        let now = chrono::Utc::now().into();
        support_tickets::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            subject: "Refund".to_string(),
            message: "I paid twice".to_string(),
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_blank_ticket_is_rejected_before_insert() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let err = SupportRepository::new(Arc::new(db))
            .create_ticket(Uuid::new_v4(), "  ", "help")
            .await
            .unwrap_err();
        assert!(matches!(err, SupportRepoError::Rule(SupportError::Invalid(_))));
    }

    #[tokio::test]
    async fn test_closed_ticket_cannot_reopen() {
        let closed = ticket("closed");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![closed.clone()]])
            .into_connection();

        let err = SupportRepository::new(Arc::new(db))
            .update_status(closed.id, TicketStatus::Open)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            SupportRepoError::Rule(SupportError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_ticket_moves_to_in_progress() {
        let open = ticket("open");
        let mut progressed = open.clone();
        progressed.status = "in_progress".to_string();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![open.clone()]])
            .append_query_results([vec![progressed.clone()]])
            .into_connection();

        let updated = SupportRepository::new(Arc::new(db))
            .update_status(open.id, TicketStatus::InProgress)
            .await
            .unwrap();
        assert_eq!(updated.status, "in_progress");
    }
}
