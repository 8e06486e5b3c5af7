use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Kind of work a tender is requesting
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "tender_service_type", rename_all = "UPPERCASE")]
pub enum ServiceType {
    Construction,
    Delivery,
    Manufacture,
}

impl sqlx::postgres::PgHasArrayType for ServiceType {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_tender_service_type")
    }
}

impl ServiceType {
    /// Parse the wire form used in query parameters
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "CONSTRUCTION" => Some(Self::Construction),
            "DELIVERY" => Some(Self::Delivery),
            "MANUFACTURE" => Some(Self::Manufacture),
            _ => None,
        }
    }
}

/// Tender status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "tender_status", rename_all = "UPPERCASE")]
pub enum TenderStatus {
    Created,
    Published,
    Closed,
}

impl TenderStatus {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "CREATED" => Some(Self::Created),
            "PUBLISHED" => Some(Self::Published),
            "CLOSED" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl Default for TenderStatus {
    fn default() -> Self {
        Self::Created
    }
}

/// Tender entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Tender {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub service_type: ServiceType,
    pub status: TenderStatus,
    pub version: i32,
    pub organization_id: Uuid,
    pub creator_username: String,
    pub created_at: DateTime<Utc>,
}

impl Tender {
    /// Build a fresh tender at version 1 with no history
    pub fn create(req: CreateTenderRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            service_type: req.service_type,
            status: TenderStatus::default(),
            version: 1,
            organization_id: req.organization_id,
            creator_username: req.creator_username,
            created_at: Utc::now(),
        }
    }
}

/// Immutable snapshot of a tender's mutable state prior to an edit
#[derive(Debug, Clone, FromRow)]
pub struct TenderHistory {
    pub id: Uuid,
    pub tender_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub service_type: ServiceType,
    pub status: TenderStatus,
    pub version: i32,
}

/// Request DTO for creating a tender
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTenderRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub service_type: ServiceType,
    pub organization_id: Uuid,
    pub creator_username: String,
}

/// Request DTO for partially updating a tender; absent fields are unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTenderRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub service_type: Option<ServiceType>,
}

/// Response DTO for tender
#[derive(Debug, Clone, Serialize)]
pub struct TenderResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub service_type: ServiceType,
    pub status: TenderStatus,
    pub version: i32,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<Tender> for TenderResponse {
    fn from(t: Tender) -> Self {
        Self {
            id: t.id,
            name: t.name,
            description: t.description,
            service_type: t.service_type,
            status: t.status,
            version: t.version,
            created_at: t.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_type_wire_form_is_uppercase() {
        assert_eq!(
            serde_json::to_string(&ServiceType::Construction).unwrap(),
            "\"CONSTRUCTION\""
        );
        assert_eq!(
            ServiceType::from_param("DELIVERY"),
            Some(ServiceType::Delivery)
        );
        assert_eq!(ServiceType::from_param("delivery"), None);
    }

    #[test]
    fn status_param_rejects_unknown_values() {
        assert_eq!(
            TenderStatus::from_param("PUBLISHED"),
            Some(TenderStatus::Published)
        );
        assert_eq!(TenderStatus::from_param("ARCHIVED"), None);
    }

    #[test]
    fn new_tender_starts_created_at_version_one() {
        let tender = Tender::create(CreateTenderRequest {
            name: "Office renovation".into(),
            description: None,
            service_type: ServiceType::Construction,
            organization_id: Uuid::new_v4(),
            creator_username: "jdoe".into(),
        });
        assert_eq!(tender.version, 1);
        assert_eq!(tender.status, TenderStatus::Created);
    }
}
