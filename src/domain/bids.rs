use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Bid status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(type_name = "bid_status", rename_all = "UPPERCASE")]
pub enum BidStatus {
    Created,
    Published,
    Canceled,
}

impl BidStatus {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "CREATED" => Some(Self::Created),
            "PUBLISHED" => Some(Self::Published),
            "CANCELED" => Some(Self::Canceled),
            _ => None,
        }
    }
}

impl Default for BidStatus {
    fn default() -> Self {
        Self::Created
    }
}

/// Discriminant for the bid author reference
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "bid_author_type")]
pub enum BidAuthorType {
    User,
    Organization,
}

/// Resolved author reference: the author id points at a user or an
/// organization depending on the stored discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BidAuthor {
    User(Uuid),
    Organization(Uuid),
}

/// Bid entity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Bid {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: BidStatus,
    pub version: i32,
    pub tender_id: Uuid,
    pub author_type: BidAuthorType,
    pub author_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Bid {
    /// Build a fresh bid at version 1 with no history
    pub fn create(req: CreateBidRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: req.name,
            description: req.description,
            status: BidStatus::default(),
            version: 1,
            tender_id: req.tender_id,
            author_type: req.author_type,
            author_id: req.author_id,
            created_at: Utc::now(),
        }
    }

    /// The author reference as a tagged union
    pub fn author(&self) -> BidAuthor {
        match self.author_type {
            BidAuthorType::User => BidAuthor::User(self.author_id),
            BidAuthorType::Organization => BidAuthor::Organization(self.author_id),
        }
    }
}

/// Immutable snapshot of a bid's mutable state prior to an edit
#[derive(Debug, Clone, FromRow)]
pub struct BidHistory {
    pub id: Uuid,
    pub bid_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: BidStatus,
    pub version: i32,
}

/// Request DTO for creating a bid
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBidRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "tenderId", alias = "tender_id")]
    pub tender_id: Uuid,
    #[serde(rename = "authorType", alias = "author_type")]
    pub author_type: BidAuthorType,
    #[serde(rename = "authorId", alias = "author_id")]
    pub author_id: Uuid,
}

/// Request DTO for partially updating a bid; absent fields are unchanged
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBidRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Response DTO for bid
#[derive(Debug, Clone, Serialize)]
pub struct BidResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub status: BidStatus,
    pub version: i32,
    #[serde(rename = "tenderId")]
    pub tender_id: Uuid,
    #[serde(rename = "authorType")]
    pub author_type: BidAuthorType,
    #[serde(rename = "authorId")]
    pub author_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<Bid> for BidResponse {
    fn from(b: Bid) -> Self {
        Self {
            id: b.id,
            name: b.name,
            description: b.description,
            status: b.status,
            version: b.version,
            tender_id: b.tender_id,
            author_type: b.author_type,
            author_id: b.author_id,
            created_at: b.created_at,
        }
    }
}

/// Verdict a tender owner can hand down on a bid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approved,
    Rejected,
}

impl Decision {
    pub fn from_param(s: &str) -> Option<Self> {
        match s {
            "Approved" => Some(Self::Approved),
            "Rejected" => Some(Self::Rejected),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_accepts_camel_case_and_snake_case_keys() {
        let camel: CreateBidRequest = serde_json::from_str(
            r#"{
                "name": "Crane rental",
                "tenderId": "1f4a2c66-58b1-4e86-a0bd-0a2b78b1a7c2",
                "authorType": "User",
                "authorId": "a7bb42d4-8701-4d23-a2a4-c0fdbb2b6f6b"
            }"#,
        )
        .unwrap();
        assert_eq!(camel.author_type, BidAuthorType::User);

        let snake: CreateBidRequest = serde_json::from_str(
            r#"{
                "name": "Crane rental",
                "tender_id": "1f4a2c66-58b1-4e86-a0bd-0a2b78b1a7c2",
                "author_type": "Organization",
                "author_id": "a7bb42d4-8701-4d23-a2a4-c0fdbb2b6f6b"
            }"#,
        )
        .unwrap();
        assert_eq!(snake.author_type, BidAuthorType::Organization);
    }

    #[test]
    fn author_union_follows_the_discriminant() {
        let req: CreateBidRequest = serde_json::from_str(
            r#"{
                "name": "Crane rental",
                "tenderId": "1f4a2c66-58b1-4e86-a0bd-0a2b78b1a7c2",
                "authorType": "Organization",
                "authorId": "a7bb42d4-8701-4d23-a2a4-c0fdbb2b6f6b"
            }"#,
        )
        .unwrap();
        let bid = Bid::create(req);
        assert_eq!(bid.author(), BidAuthor::Organization(bid.author_id));
        assert_eq!(bid.version, 1);
        assert_eq!(bid.status, BidStatus::Created);
    }

    #[test]
    fn decision_parsing_is_exact() {
        assert_eq!(Decision::from_param("Approved"), Some(Decision::Approved));
        assert_eq!(Decision::from_param("Rejected"), Some(Decision::Rejected));
        assert_eq!(Decision::from_param("approved"), None);
        assert_eq!(Decision::from_param("Awarded"), None);
    }

    #[test]
    fn response_uses_camel_case_references() {
        let req: CreateBidRequest = serde_json::from_str(
            r#"{
                "name": "Crane rental",
                "tenderId": "1f4a2c66-58b1-4e86-a0bd-0a2b78b1a7c2",
                "authorType": "User",
                "authorId": "a7bb42d4-8701-4d23-a2a4-c0fdbb2b6f6b"
            }"#,
        )
        .unwrap();
        let body = serde_json::to_value(BidResponse::from(Bid::create(req))).unwrap();
        assert!(body.get("tenderId").is_some());
        assert!(body.get("authorType").is_some());
        assert_eq!(body["status"], "CREATED");
    }
}
