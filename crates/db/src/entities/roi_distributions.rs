//! `SeaORM` Entity for roi_distributions table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "roi_distributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub shareholder_id: Uuid,
    pub pool_amount: Decimal,
    pub percentage: Decimal,
    pub amount: Decimal,
    pub period_start: Date,
    pub period_end: Date,
    pub enabled: bool,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::roi_withdrawal_requests::Entity")]
    WithdrawalRequests,
}

impl Related<super::roi_withdrawal_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WithdrawalRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
