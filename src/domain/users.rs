use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Legal form of an organization
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "organization_type", rename_all = "UPPERCASE")]
pub enum OrganizationType {
    /// Individual entrepreneur
    Ie,
    /// Limited liability company
    Llc,
    /// Joint stock company
    Jsc,
}

/// User entity (stored in the `employee` table)
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Organization entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Organization {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub org_type: OrganizationType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Link granting a user the right to act on behalf of an organization
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrganizationResponsible {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn organization_type_wire_form_is_uppercase() {
        assert_eq!(
            serde_json::to_string(&OrganizationType::Llc).unwrap(),
            "\"LLC\""
        );
        let parsed: OrganizationType = serde_json::from_str("\"IE\"").unwrap();
        assert_eq!(parsed, OrganizationType::Ie);
    }
}
