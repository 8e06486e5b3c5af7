//! Generic edit-history engine
//!
//! Tenders and bids share the same lifecycle: every edit snapshots the
//! pre-edit state into a history table and bumps the version by one, and a
//! rollback restores an earlier snapshot and truncates the history above it.
//! The logic lives here once; the entities supply their state machine and
//! SQL through the two traits below.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::ApiError;

/// State-machine half of a versioned entity.
pub trait Versioned {
    /// Immutable history row capturing pre-edit state.
    type Snapshot: Send + Sync;
    /// Partial update; absent fields leave state unchanged.
    type Patch: Send;

    fn id(&self) -> Uuid;
    fn version(&self) -> i32;
    fn set_version(&mut self, version: i32);

    /// Capture the current mutable state at the current version.
    fn snapshot(&self) -> Self::Snapshot;
    /// Overwrite mutable state (version included) from a snapshot.
    fn restore(&mut self, snapshot: &Self::Snapshot);
    /// Apply the fields present in the patch.
    fn apply(&mut self, patch: Self::Patch);
}

/// Persistence half, executed inside the caller's transaction.
#[async_trait]
pub trait VersionedStore: Versioned + Sized + Send + Sync {
    async fn insert_snapshot(
        conn: &mut PgConnection,
        snapshot: &Self::Snapshot,
    ) -> Result<(), sqlx::Error>;

    async fn snapshot_at(
        conn: &mut PgConnection,
        id: Uuid,
        version: i32,
    ) -> Result<Option<Self::Snapshot>, sqlx::Error>;

    /// Delete every snapshot at or above the given version. The snapshot at
    /// the version itself is consumed by a rollback: its state becomes the
    /// live row again, so keeping it would leave a duplicate that blocks the
    /// next edit from reusing the slot.
    async fn prune_from(
        conn: &mut PgConnection,
        id: Uuid,
        version: i32,
    ) -> Result<u64, sqlx::Error>;

    /// Persist the current state, guarded on the version the caller read.
    /// Returns false when another writer got there first.
    async fn update_guarded(
        &self,
        conn: &mut PgConnection,
        expected_version: i32,
    ) -> Result<bool, sqlx::Error>;
}

#[derive(Debug, PartialEq, Eq)]
enum RollbackPlan {
    Noop,
    Restore,
}

fn plan_rollback(current: i32, target: i32) -> Result<RollbackPlan, ApiError> {
    if target < 1 || target > current {
        return Err(ApiError::NotFound("version not found".to_string()));
    }
    if target == current {
        Ok(RollbackPlan::Noop)
    } else {
        Ok(RollbackPlan::Restore)
    }
}

/// Apply a partial edit: snapshot the pre-edit state, bump the version,
/// persist both atomically.
pub async fn edit<E>(pool: &PgPool, mut entity: E, patch: E::Patch) -> Result<E, ApiError>
where
    E: VersionedStore,
{
    let held = entity.version();
    let snapshot = entity.snapshot();

    let mut tx = pool.begin().await?;
    E::insert_snapshot(&mut tx, &snapshot).await?;

    entity.apply(patch);
    entity.set_version(held + 1);
    if !entity.update_guarded(&mut tx, held).await? {
        return Err(ApiError::Conflict(
            "entity was modified concurrently".to_string(),
        ));
    }
    tx.commit().await?;

    tracing::debug!(id = %entity.id(), version = entity.version(), "Edit applied");
    Ok(entity)
}

/// Restore the state recorded at `target_version` and truncate the history
/// from that version up. A rollback to the current version is a no-op; a
/// target outside [1, current] does not exist.
pub async fn rollback<E>(pool: &PgPool, mut entity: E, target_version: i32) -> Result<E, ApiError>
where
    E: VersionedStore,
{
    match plan_rollback(entity.version(), target_version)? {
        RollbackPlan::Noop => Ok(entity),
        RollbackPlan::Restore => {
            let held = entity.version();

            let mut tx = pool.begin().await?;
            // The invariant guarantees a snapshot for every reached version;
            // a miss here means the history chain is corrupted.
            let snapshot = E::snapshot_at(&mut tx, entity.id(), target_version)
                .await?
                .ok_or_else(|| ApiError::NotFound("version not found".to_string()))?;

            entity.restore(&snapshot);
            E::prune_from(&mut tx, entity.id(), target_version).await?;
            if !entity.update_guarded(&mut tx, held).await? {
                return Err(ApiError::Conflict(
                    "entity was modified concurrently".to_string(),
                ));
            }
            tx.commit().await?;

            tracing::debug!(id = %entity.id(), version = entity.version(), "Rollback applied");
            Ok(entity)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rollback_to_current_version_is_a_noop() {
        assert_eq!(plan_rollback(3, 3).unwrap(), RollbackPlan::Noop);
    }

    #[test]
    fn rollback_to_earlier_version_restores() {
        assert_eq!(plan_rollback(3, 1).unwrap(), RollbackPlan::Restore);
        assert_eq!(plan_rollback(2, 1).unwrap(), RollbackPlan::Restore);
    }

    #[test]
    fn rollback_outside_range_is_not_found() {
        assert!(matches!(plan_rollback(3, 0), Err(ApiError::NotFound(_))));
        assert!(matches!(plan_rollback(3, -1), Err(ApiError::NotFound(_))));
        assert!(matches!(plan_rollback(3, 4), Err(ApiError::NotFound(_))));
    }
}
