//! Bid decision workflow
//!
//! A responsible user of the tender's owning organization hands down a
//! verdict on a bid. Approving closes the tender and cancels the bid;
//! rejecting cancels the bid only. Both status writes happen in one
//! transaction.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::IdentityResolver;
use crate::domain::{Bid, BidStatus, Decision, TenderStatus};
use crate::error::{ApiError, ApiResult};
use crate::store::{BidStore, TenderStore};

pub struct DecisionService<'a> {
    db: &'a PgPool,
}

impl<'a> DecisionService<'a> {
    pub fn new(db: &'a PgPool) -> Self {
        Self { db }
    }

    pub async fn submit(&self, bid_id: Uuid, decision: &str, username: &str) -> ApiResult<Bid> {
        let bid = BidStore::new(self.db)
            .find(bid_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("bid not found".to_string()))?;
        let tender = TenderStore::new(self.db)
            .find(bid.tender_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("tender not found".to_string()))?;

        let identity = IdentityResolver::new(self.db);
        let user = identity.require_user(username).await?;
        let link = identity
            .responsible_link(user.id, tender.organization_id)
            .await?;
        if link.is_none() {
            return Err(ApiError::Forbidden(
                "user does not have access to this tender".to_string(),
            ));
        }

        let decision = Decision::from_param(decision)
            .ok_or_else(|| ApiError::BadRequest("decision not found".to_string()))?;

        let mut tx = self.db.begin().await?;
        let updated = match decision {
            Decision::Approved => {
                // Closing the tender and canceling the bid must land together
                sqlx::query("UPDATE tenders SET status = $2 WHERE id = $1")
                    .bind(tender.id)
                    .bind(TenderStatus::Closed)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query_as::<_, Bid>("UPDATE bids SET status = $2 WHERE id = $1 RETURNING *")
                    .bind(bid.id)
                    .bind(BidStatus::Canceled)
                    .fetch_one(&mut *tx)
                    .await?
            }
            Decision::Rejected => {
                sqlx::query_as::<_, Bid>("UPDATE bids SET status = $2 WHERE id = $1 RETURNING *")
                    .bind(bid.id)
                    .bind(BidStatus::Canceled)
                    .fetch_one(&mut *tx)
                    .await?
            }
        };
        tx.commit().await?;

        tracing::info!(
            bid_id = %bid.id,
            tender_id = %tender.id,
            username = %user.username,
            decision = ?decision,
            "Decision applied"
        );
        Ok(updated)
    }
}
