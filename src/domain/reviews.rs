use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Free-text review attached to a bid
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Review {
    pub id: Uuid,
    pub content: String,
    pub bid_id: Uuid,
    pub creator_username: String,
    pub created_at: DateTime<Utc>,
}

/// Response DTO for review
#[derive(Debug, Clone, Serialize)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub content: String,
    pub bid_id: Uuid,
    pub creator_username: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(r: Review) -> Self {
        Self {
            id: r.id,
            content: r.content,
            bid_id: r.bid_id,
            creator_username: r.creator_username,
            created_at: r.created_at,
        }
    }
}
