//! Bid store and revision wiring.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::api::ListParams;
use crate::domain::{Bid, BidAuthorType, BidHistory, BidStatus, UpdateBidRequest};
use crate::store::revisions::{Versioned, VersionedStore};

/// Store for bid lookups and writes
pub struct BidStore<'a> {
    db: &'a PgPool,
}

impl<'a> BidStore<'a> {
    pub fn new(db: &'a PgPool) -> Self {
        Self { db }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>("SELECT * FROM bids WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db)
            .await
    }

    pub async fn insert(&self, bid: &Bid) -> Result<Bid, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            "INSERT INTO bids \
             (id, name, description, status, version, tender_id, author_type, author_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(bid.id)
        .bind(&bid.name)
        .bind(&bid.description)
        .bind(bid.status)
        .bind(bid.version)
        .bind(bid.tender_id)
        .bind(bid.author_type)
        .bind(bid.author_id)
        .bind(bid.created_at)
        .fetch_one(self.db)
        .await
    }

    pub async fn list_by_tender(
        &self,
        tender_id: Uuid,
        page: &ListParams,
    ) -> Result<Vec<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            "SELECT * FROM bids WHERE tender_id = $1 ORDER BY name ASC LIMIT $2 OFFSET $3",
        )
        .bind(tender_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.db)
        .await
    }

    /// Bids submitted by the given user acting as an individual.
    pub async fn list_by_author_user(
        &self,
        user_id: Uuid,
        page: &ListParams,
    ) -> Result<Vec<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>(
            "SELECT * FROM bids WHERE author_type = $1 AND author_id = $2 \
             ORDER BY name ASC LIMIT $3 OFFSET $4",
        )
        .bind(BidAuthorType::User)
        .bind(user_id)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.db)
        .await
    }

    /// Direct status overwrite; no history snapshot, no version bump.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: BidStatus,
    ) -> Result<Option<Bid>, sqlx::Error> {
        sqlx::query_as::<_, Bid>("UPDATE bids SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(self.db)
            .await
    }
}

impl Versioned for Bid {
    type Snapshot = BidHistory;
    type Patch = UpdateBidRequest;

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    fn snapshot(&self) -> BidHistory {
        BidHistory {
            id: Uuid::new_v4(),
            bid_id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            status: self.status,
            version: self.version,
        }
    }

    fn restore(&mut self, snapshot: &BidHistory) {
        self.name = snapshot.name.clone();
        self.description = snapshot.description.clone();
        self.status = snapshot.status;
        self.version = snapshot.version;
    }

    fn apply(&mut self, patch: UpdateBidRequest) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
    }
}

#[async_trait]
impl VersionedStore for Bid {
    async fn insert_snapshot(
        conn: &mut PgConnection,
        snapshot: &BidHistory,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO bid_history (id, bid_id, name, description, status, version) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(snapshot.id)
        .bind(snapshot.bid_id)
        .bind(&snapshot.name)
        .bind(&snapshot.description)
        .bind(snapshot.status)
        .bind(snapshot.version)
        .execute(conn)
        .await?;
        Ok(())
    }

    async fn snapshot_at(
        conn: &mut PgConnection,
        id: Uuid,
        version: i32,
    ) -> Result<Option<BidHistory>, sqlx::Error> {
        sqlx::query_as::<_, BidHistory>(
            "SELECT * FROM bid_history WHERE bid_id = $1 AND version = $2",
        )
        .bind(id)
        .bind(version)
        .fetch_optional(conn)
        .await
    }

    async fn prune_from(
        conn: &mut PgConnection,
        id: Uuid,
        version: i32,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM bid_history WHERE bid_id = $1 AND version >= $2")
            .bind(id)
            .bind(version)
            .execute(conn)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_guarded(
        &self,
        conn: &mut PgConnection,
        expected_version: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE bids SET name = $3, description = $4, status = $5, version = $6 \
             WHERE id = $1 AND version = $2",
        )
        .bind(self.id)
        .bind(expected_version)
        .bind(&self.name)
        .bind(&self.description)
        .bind(self.status)
        .bind(self.version)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_bid() -> Bid {
        Bid {
            id: Uuid::new_v4(),
            name: "Crane rental".into(),
            description: None,
            status: BidStatus::Created,
            version: 1,
            tender_id: Uuid::new_v4(),
            author_type: BidAuthorType::User,
            author_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn snapshot_and_restore_round_trip() {
        let mut bid = sample_bid();
        let snap = bid.snapshot();

        bid.apply(UpdateBidRequest {
            name: Some("Crane rental and operation".into()),
            description: Some("two cranes".into()),
        });
        bid.set_version(2);
        assert_eq!(bid.name, "Crane rental and operation");

        bid.restore(&snap);
        assert_eq!(bid.name, "Crane rental");
        assert_eq!(bid.description, None);
        assert_eq!(bid.version, 1);
    }

    #[test]
    fn apply_patch_leaves_absent_fields_unchanged() {
        let mut bid = sample_bid();
        bid.apply(UpdateBidRequest {
            description: Some("subcontracted".into()),
            ..Default::default()
        });
        assert_eq!(bid.name, "Crane rental");
        assert_eq!(bid.description.as_deref(), Some("subcontracted"));
    }
}
