//! Profile repository: accounts, roles and staff assignments.

use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use yaracheck_core::access::Profile;
use yaracheck_core::auth::{AdminRole, Role};
use yaracheck_shared::types::{CountryId, PageRequest, ProfileId, ProvinceId};

use crate::entities::profiles;

/// Input for creating a staff profile.
#[derive(Debug, Clone)]
pub struct CreateProfileInput {
    /// Login email.
    pub email: String,
    /// Argon2 hash.
    pub password_hash: String,
    /// Display name.
    pub full_name: String,
    /// Coarse role.
    pub role: Role,
    /// Fine-grained staff role.
    pub admin_role: Option<AdminRole>,
    /// Explicit grants.
    pub permissions: Map<String, Value>,
    /// Assigned country.
    pub country_id: Option<Uuid>,
    /// Assigned province.
    pub province_id: Option<Uuid>,
}

/// Partial update of a profile. `None` leaves a field unchanged; for the
/// nullable columns, `Some(None)` clears them.
#[derive(Debug, Clone, Default)]
pub struct UpdateProfileInput {
    /// New display name.
    pub full_name: Option<String>,
    /// New coarse role.
    pub role: Option<Role>,
    /// New admin role.
    pub admin_role: Option<Option<AdminRole>>,
    /// Replacement grants.
    pub permissions: Option<Map<String, Value>>,
    /// New country assignment.
    pub country_id: Option<Option<Uuid>>,
    /// New province assignment.
    pub province_id: Option<Option<Uuid>>,
    /// Activation flag.
    pub is_active: Option<bool>,
}

/// Builds the access view of a stored profile.
///
/// # Errors
///
/// Returns `DbErr::Type` if the stored role values are not recognised.
pub fn to_access_profile(model: &profiles::Model) -> Result<Profile, DbErr> {
    let role = Role::parse(&model.role)
        .ok_or_else(|| DbErr::Type(format!("unknown role '{}'", model.role)))?;
    let admin_role = match model.admin_role.as_deref() {
        Some(r) => Some(
            AdminRole::parse(r).ok_or_else(|| DbErr::Type(format!("unknown admin_role '{r}'")))?,
        ),
        None => None,
    };

    Ok(Profile {
        id: ProfileId::from_uuid(model.id),
        role,
        admin_role,
        permissions: Profile::permissions_from_json(Some(model.permissions.clone())),
        country_id: model.country_id.map(CountryId::from_uuid),
        province_id: model.province_id.map(ProvinceId::from_uuid),
    })
}

/// Profile repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    db: Arc<DatabaseConnection>,
}

impl ProfileRepository {
    /// Creates a new profile repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Finds a profile by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> Result<Option<profiles::Model>, DbErr> {
        profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db.as_ref())
            .await
    }

    /// Finds a profile by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<profiles::Model>, DbErr> {
        profiles::Entity::find_by_id(id).one(self.db.as_ref()).await
    }

    /// Checks if an email is already registered.
    pub async fn email_exists(&self, email: &str) -> Result<bool, DbErr> {
        let count = profiles::Entity::find()
            .filter(profiles::Column::Email.eq(email.trim().to_lowercase()))
            .count(self.db.as_ref())
            .await?;

        Ok(count > 0)
    }

    /// Registers a member of the public.
    pub async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
        full_name: &str,
    ) -> Result<profiles::Model, DbErr> {
        self.create(CreateProfileInput {
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            full_name: full_name.to_string(),
            role: Role::User,
            admin_role: None,
            permissions: Map::new(),
            country_id: None,
            province_id: None,
        })
        .await
    }

    /// Creates a profile with any role.
    pub async fn create(&self, input: CreateProfileInput) -> Result<profiles::Model, DbErr> {
        let now = chrono::Utc::now().into();
        let profile = profiles::ActiveModel {
            id: Set(Uuid::now_v7()),
            email: Set(input.email.trim().to_lowercase()),
            full_name: Set(input.full_name.trim().to_string()),
            password_hash: Set(input.password_hash),
            role: Set(input.role.as_str().to_string()),
            admin_role: Set(input.admin_role.map(|r| r.as_str().to_string())),
            permissions: Set(Value::Object(input.permissions)),
            country_id: Set(input.country_id),
            province_id: Set(input.province_id),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };

        profile.insert(self.db.as_ref()).await
    }

    /// Lists profiles, newest first.
    pub async fn list(&self, page: &PageRequest) -> Result<(Vec<profiles::Model>, u64), DbErr> {
        let paginator = profiles::Entity::find()
            .order_by_desc(profiles::Column::CreatedAt)
            .paginate(self.db.as_ref(), page.limit());
        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(u64::from(page.page() - 1)).await?;
        Ok((items, total))
    }

    /// Applies a partial update. Returns `None` if the profile does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateProfileInput,
    ) -> Result<Option<profiles::Model>, DbErr> {
        let Some(existing) = self.find_by_id(id).await? else {
            return Ok(None);
        };

        let mut active: profiles::ActiveModel = existing.into();
        if let Some(full_name) = input.full_name {
            active.full_name = Set(full_name.trim().to_string());
        }
        if let Some(role) = input.role {
            active.role = Set(role.as_str().to_string());
        }
        if let Some(admin_role) = input.admin_role {
            active.admin_role = Set(admin_role.map(|r| r.as_str().to_string()));
        }
        if let Some(permissions) = input.permissions {
            active.permissions = Set(Value::Object(permissions));
        }
        if let Some(country_id) = input.country_id {
            active.country_id = Set(country_id);
        }
        if let Some(province_id) = input.province_id {
            active.province_id = Set(province_id);
        }
        if let Some(is_active) = input.is_active {
            active.is_active = Set(is_active);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        active.update(self.db.as_ref()).await.map(Some)
    }
}
