//! Identity resolution
//!
//! Resolves usernames and organization ids to their records and looks up
//! the responsibility links between them. Every mutation in the API starts
//! here: a principal that cannot be resolved is Unauthorized before any
//! entity is touched.

use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{Organization, OrganizationResponsible, User};
use crate::error::{ApiError, ApiResult};

pub struct IdentityResolver<'a> {
    db: &'a PgPool,
}

impl<'a> IdentityResolver<'a> {
    pub fn new(db: &'a PgPool) -> Self {
        Self { db }
    }

    /// Resolve a username to a user; blank or unknown usernames are
    /// Unauthorized.
    pub async fn require_user(&self, username: &str) -> ApiResult<User> {
        if username.is_empty() {
            return Err(ApiError::Unauthorized("user not found".to_string()));
        }
        sqlx::query_as::<_, User>("SELECT * FROM employee WHERE username = $1")
            .bind(username)
            .fetch_optional(self.db)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("user not found".to_string()))
    }

    pub async fn find_user_by_id(&self, id: Uuid) -> ApiResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM employee WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db)
            .await?;
        Ok(user)
    }

    /// Resolve an organization id; unknown organizations are Unauthorized
    /// (the declared principal context does not exist).
    pub async fn require_organization(&self, id: Uuid) -> ApiResult<Organization> {
        self.find_organization(id)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("organization not found".to_string()))
    }

    pub async fn find_organization(&self, id: Uuid) -> ApiResult<Option<Organization>> {
        let organization =
            sqlx::query_as::<_, Organization>("SELECT * FROM organization WHERE id = $1")
                .bind(id)
                .fetch_optional(self.db)
                .await?;
        Ok(organization)
    }

    /// The responsibility link between a user and a specific organization,
    /// if any.
    pub async fn responsible_link(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> ApiResult<Option<OrganizationResponsible>> {
        let link = sqlx::query_as::<_, OrganizationResponsible>(
            "SELECT * FROM organization_responsible WHERE user_id = $1 AND organization_id = $2",
        )
        .bind(user_id)
        .bind(organization_id)
        .fetch_optional(self.db)
        .await?;
        Ok(link)
    }

    /// All responsibility links held by a user.
    pub async fn responsibilities(
        &self,
        user_id: Uuid,
    ) -> ApiResult<Vec<OrganizationResponsible>> {
        let links = sqlx::query_as::<_, OrganizationResponsible>(
            "SELECT * FROM organization_responsible WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(self.db)
        .await?;
        Ok(links)
    }
}
