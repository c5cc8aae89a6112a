//! Company asset repository.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::entities::company_assets;

/// Input for creating an asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAssetInput {
    /// Asset name.
    pub name: String,
    /// Free-form category, e.g. "equipment".
    pub category: String,
    /// Book value.
    pub value: Decimal,
    /// Acquisition date.
    #[serde(default)]
    pub acquired_on: Option<NaiveDate>,
    /// Free text.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input for updating an asset. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAssetInput {
    /// New name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New value.
    pub value: Option<Decimal>,
    /// New acquisition date.
    pub acquired_on: Option<NaiveDate>,
    /// New notes.
    pub notes: Option<String>,
}

/// Company asset repository.
#[derive(Debug, Clone)]
pub struct AssetRepository {
    db: Arc<DatabaseConnection>,
}

impl AssetRepository {
    /// Creates a new asset repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists assets by name.
    pub async fn list(&self) -> Result<Vec<company_assets::Model>, DbErr> {
        company_assets::Entity::find()
            .order_by_asc(company_assets::Column::Name)
            .all(self.db.as_ref())
            .await
    }

    /// Creates an asset.
    pub async fn create(&self, input: CreateAssetInput) -> Result<company_assets::Model, DbErr> {
        let now = chrono::Utc::now().into();
        company_assets::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(input.name.trim().to_string()),
            category: Set(input.category.trim().to_string()),
            value: Set(input.value),
            acquired_on: Set(input.acquired_on),
            notes: Set(input.notes),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(self.db.as_ref())
        .await
    }

    /// Updates an asset. Returns `None` if it does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateAssetInput,
    ) -> Result<Option<company_assets::Model>, DbErr> {
        let Some(asset) = company_assets::Entity::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };

        let mut active: company_assets::ActiveModel = asset.into();
        if let Some(name) = input.name {
            active.name = Set(name.trim().to_string());
        }
        if let Some(category) = input.category {
            active.category = Set(category.trim().to_string());
        }
        if let Some(value) = input.value {
            active.value = Set(value);
        }
        if let Some(acquired_on) = input.acquired_on {
            active.acquired_on = Set(Some(acquired_on));
        }
        if let Some(notes) = input.notes {
            active.notes = Set(Some(notes));
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(self.db.as_ref()).await.map(Some)
    }

    /// Deletes an asset. Returns false if it did not exist.
    pub async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        let result = company_assets::Entity::delete_by_id(id).exec(self.db.as_ref()).await?;
        Ok(result.rows_affected > 0)
    }
}
