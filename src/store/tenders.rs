//! Tender store and revision wiring.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::api::ListParams;
use crate::domain::{ServiceType, Tender, TenderHistory, TenderStatus, UpdateTenderRequest};
use crate::store::revisions::{Versioned, VersionedStore};

/// Store for tender lookups and writes
pub struct TenderStore<'a> {
    db: &'a PgPool,
}

impl<'a> TenderStore<'a> {
    pub fn new(db: &'a PgPool) -> Self {
        Self { db }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<Tender>, sqlx::Error> {
        sqlx::query_as::<_, Tender>("SELECT * FROM tenders WHERE id = $1")
            .bind(id)
            .fetch_optional(self.db)
            .await
    }

    pub async fn insert(&self, tender: &Tender) -> Result<Tender, sqlx::Error> {
        sqlx::query_as::<_, Tender>(
            "INSERT INTO tenders \
             (id, name, description, service_type, status, version, organization_id, creator_username, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
        )
        .bind(tender.id)
        .bind(&tender.name)
        .bind(&tender.description)
        .bind(tender.service_type)
        .bind(tender.status)
        .bind(tender.version)
        .bind(tender.organization_id)
        .bind(&tender.creator_username)
        .bind(tender.created_at)
        .fetch_one(self.db)
        .await
    }

    /// List tenders, optionally restricted to the given service types.
    pub async fn list(
        &self,
        service_types: &[ServiceType],
        page: &ListParams,
    ) -> Result<Vec<Tender>, sqlx::Error> {
        if service_types.is_empty() {
            sqlx::query_as::<_, Tender>(
                "SELECT * FROM tenders ORDER BY name ASC LIMIT $1 OFFSET $2",
            )
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.db)
            .await
        } else {
            sqlx::query_as::<_, Tender>(
                "SELECT * FROM tenders WHERE service_type = ANY($1) \
                 ORDER BY name ASC LIMIT $2 OFFSET $3",
            )
            .bind(service_types)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(self.db)
            .await
        }
    }

    pub async fn list_by_creator(
        &self,
        username: &str,
        page: &ListParams,
    ) -> Result<Vec<Tender>, sqlx::Error> {
        sqlx::query_as::<_, Tender>(
            "SELECT * FROM tenders WHERE creator_username = $1 \
             ORDER BY name ASC LIMIT $2 OFFSET $3",
        )
        .bind(username)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(self.db)
        .await
    }

    /// Direct status overwrite; no history snapshot, no version bump.
    pub async fn set_status(
        &self,
        id: Uuid,
        status: TenderStatus,
    ) -> Result<Option<Tender>, sqlx::Error> {
        sqlx::query_as::<_, Tender>("UPDATE tenders SET status = $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(status)
            .fetch_optional(self.db)
            .await
    }
}

impl Versioned for Tender {
    type Snapshot = TenderHistory;
    type Patch = UpdateTenderRequest;

    fn id(&self) -> Uuid {
        self.id
    }

    fn version(&self) -> i32 {
        self.version
    }

    fn set_version(&mut self, version: i32) {
        self.version = version;
    }

    fn snapshot(&self) -> TenderHistory {
        TenderHistory {
            id: Uuid::new_v4(),
            tender_id: self.id,
            name: self.name.clone(),
            description: self.description.clone(),
            service_type: self.service_type,
            status: self.status,
            version: self.version,
        }
    }

    fn restore(&mut self, snapshot: &TenderHistory) {
        self.name = snapshot.name.clone();
        self.description = snapshot.description.clone();
        self.service_type = snapshot.service_type;
        self.status = snapshot.status;
        self.version = snapshot.version;
    }

    fn apply(&mut self, patch: UpdateTenderRequest) {
        if let Some(name) = patch.name {
            self.name = name;
        }
        if let Some(description) = patch.description {
            self.description = Some(description);
        }
        if let Some(service_type) = patch.service_type {
            self.service_type = service_type;
        }
    }
}

#[async_trait]
impl VersionedStore for Tender {
    async fn insert_snapshot(
        conn: &mut PgConnection,
        snapshot: &TenderHistory,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "INSERT INTO tender_history (id, tender_id, name, description, service_type, status, version) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(snapshot.id)
        .bind(snapshot.tender_id)
        .bind(&snapshot.name)
        .bind(&snapshot.description)
        .bind(snapshot.service_type)
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
    ) -> Result<Option<TenderHistory>, sqlx::Error> {
        sqlx::query_as::<_, TenderHistory>(
            "SELECT * FROM tender_history WHERE tender_id = $1 AND version = $2",
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
        let result = sqlx::query("DELETE FROM tender_history WHERE tender_id = $1 AND version >= $2")
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
            "UPDATE tenders SET name = $3, description = $4, service_type = $5, status = $6, version = $7 \
             WHERE id = $1 AND version = $2",
        )
        .bind(self.id)
        .bind(expected_version)
        .bind(&self.name)
        .bind(&self.description)
        .bind(self.service_type)
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

    fn sample_tender() -> Tender {
        Tender {
            id: Uuid::new_v4(),
            name: "Warehouse build".into(),
            description: Some("initial scope".into()),
            service_type: ServiceType::Construction,
            status: TenderStatus::Published,
            version: 1,
            organization_id: Uuid::new_v4(),
            creator_username: "jdoe".into(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn snapshot_captures_pre_edit_state() {
        let tender = sample_tender();
        let snap = tender.snapshot();
        assert_eq!(snap.tender_id, tender.id);
        assert_eq!(snap.name, tender.name);
        assert_eq!(snap.version, 1);
    }

    #[test]
    fn apply_patch_leaves_absent_fields_unchanged() {
        let mut tender = sample_tender();
        tender.apply(UpdateTenderRequest {
            description: Some("revised scope".into()),
            ..Default::default()
        });
        assert_eq!(tender.name, "Warehouse build");
        assert_eq!(tender.description.as_deref(), Some("revised scope"));
        assert_eq!(tender.service_type, ServiceType::Construction);
    }

    #[test]
    fn restore_round_trips_every_mutable_field() {
        let mut tender = sample_tender();
        let snap = tender.snapshot();

        tender.apply(UpdateTenderRequest {
            name: Some("Warehouse rebuild".into()),
            description: Some("revised scope".into()),
            service_type: Some(ServiceType::Delivery),
        });
        tender.set_version(2);

        tender.restore(&snap);
        assert_eq!(tender.name, "Warehouse build");
        assert_eq!(tender.description.as_deref(), Some("initial scope"));
        assert_eq!(tender.service_type, ServiceType::Construction);
        assert_eq!(tender.version, 1);
    }
}
