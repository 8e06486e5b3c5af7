//! Review store.

use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::domain::{BidAuthorType, Review};

/// Store for review reads
pub struct ReviewStore<'a> {
    db: &'a PgPool,
}

impl<'a> ReviewStore<'a> {
    pub fn new(db: &'a PgPool) -> Self {
        Self { db }
    }

    /// Reviews attached to any bid of the given tender, optionally narrowed
    /// by review author or by bids submitted on behalf of an organization.
    pub async fn list_for_tender(
        &self,
        tender_id: Uuid,
        author_username: Option<&str>,
        organization_id: Option<Uuid>,
    ) -> Result<Vec<Review>, sqlx::Error> {
        let mut query = QueryBuilder::<Postgres>::new(
            "SELECT r.id, r.content, r.bid_id, r.creator_username, r.created_at \
             FROM review r JOIN bids b ON b.id = r.bid_id WHERE b.tender_id = ",
        );
        query.push_bind(tender_id);

        if let Some(username) = author_username {
            query.push(" AND r.creator_username = ");
            query.push_bind(username);
        }
        if let Some(organization_id) = organization_id {
            query.push(" AND b.author_type = ");
            query.push_bind(BidAuthorType::Organization);
            query.push(" AND b.author_id = ");
            query.push_bind(organization_id);
        }
        query.push(" ORDER BY r.created_at ASC");

        query
            .build_query_as::<Review>()
            .fetch_all(self.db)
            .await
    }
}
