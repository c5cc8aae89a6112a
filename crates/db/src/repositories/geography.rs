//! Countries, provinces and admin scope resolution.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use yaracheck_core::access::{GeoScope, Profile, ScopeResolution, resolve_scope};
use yaracheck_shared::types::CountryId;

use crate::entities::{countries, provinces};

/// Geography repository.
#[derive(Debug, Clone)]
pub struct GeographyRepository {
    db: Arc<DatabaseConnection>,
}

impl GeographyRepository {
    /// Creates a new geography repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Lists all countries by name.
    pub async fn list_countries(&self) -> Result<Vec<countries::Model>, DbErr> {
        countries::Entity::find()
            .order_by_asc(countries::Column::Name)
            .all(self.db.as_ref())
            .await
    }

    /// Lists provinces, optionally for one country.
    pub async fn list_provinces(
        &self,
        country_id: Option<Uuid>,
    ) -> Result<Vec<provinces::Model>, DbErr> {
        let mut query = provinces::Entity::find().order_by_asc(provinces::Column::Name);
        if let Some(country_id) = country_id {
            query = query.filter(provinces::Column::CountryId.eq(country_id));
        }
        query.all(self.db.as_ref()).await
    }

    /// Returns true when the country exists.
    pub async fn country_exists(&self, country_id: Uuid) -> Result<bool, DbErr> {
        Ok(countries::Entity::find_by_id(country_id)
            .one(self.db.as_ref())
            .await?
            .is_some())
    }

    /// Finds a country by ISO 3166-1 alpha-2 code.
    pub async fn find_country_by_iso(
        &self,
        iso_code: &str,
    ) -> Result<Option<countries::Model>, DbErr> {
        countries::Entity::find()
            .filter(countries::Column::IsoCode.eq(iso_code.trim().to_uppercase()))
            .one(self.db.as_ref())
            .await
    }

    /// Creates a country. `iso_code` is stored upper-case.
    pub async fn create_country(
        &self,
        name: &str,
        iso_code: &str,
    ) -> Result<countries::Model, DbErr> {
        countries::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.trim().to_string()),
            iso_code: Set(iso_code.trim().to_uppercase()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await
    }

    /// Creates a province in a country.
    pub async fn create_province(
        &self,
        country_id: Uuid,
        name: &str,
    ) -> Result<provinces::Model, DbErr> {
        provinces::ActiveModel {
            id: Set(Uuid::now_v7()),
            country_id: Set(country_id),
            name: Set(name.trim().to_string()),
            created_at: Set(chrono::Utc::now().into()),
        }
        .insert(self.db.as_ref())
        .await
    }

    /// Returns the country a province belongs to, if the province exists.
    pub async fn country_of_province(&self, province_id: Uuid) -> Result<Option<Uuid>, DbErr> {
        Ok(provinces::Entity::find_by_id(province_id)
            .one(self.db.as_ref())
            .await?
            .map(|p| p.country_id))
    }

    /// Resolves which rows an admin may see, doing the province lookup when
    /// the profile only has a province assignment.
    pub async fn resolve_scope(&self, profile: &Profile) -> Result<GeoScope, DbErr> {
        match resolve_scope(profile) {
            ScopeResolution::Resolved(scope) => Ok(scope),
            pending @ ScopeResolution::ViaProvince(province_id) => {
                let country = self
                    .country_of_province(province_id.into_inner())
                    .await?
                    .map(CountryId::from_uuid);
                if country.is_none() {
                    tracing::warn!(
                        profile_id = %profile.id,
                        province_id = %province_id,
                        "Assigned province no longer exists"
                    );
                }
                Ok(pending.finish(country))
            }
        }
    }
}
