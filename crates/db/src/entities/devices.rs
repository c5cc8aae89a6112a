//! `SeaORM` Entity for the devices table (device reports).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "devices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub tracking_code: String,
    pub status: String,
    pub reporter_id: Uuid,
    pub country_id: Option<Uuid>,
    pub province_id: Option<Uuid>,
    pub price_cents: i64,
    pub currency: String,
    pub device_type: String,
    pub brand: String,
    pub model: String,
    pub imei: Option<String>,
    pub serial_number: Option<String>,
    pub year: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::ReporterId",
        to = "super::profiles::Column::Id"
    )]
    Reporter,
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
