use std::sync::Arc;

use models::pickup::{self, PickupStatus};
use sea_orm::prelude::DateTime;
use tracing::{debug, info, instrument};

use super::domain::{NewPickup, PickupChanges, PickupFilter};
use super::impact::ImpactReport;
use super::repository::PickupRepository;
use crate::errors::ServiceError;

const UPDATE_ATTEMPTS: usize = 3;

/// Application service encapsulating pickup business rules.
/// Validation and lifecycle policy live here; storage is behind `PickupRepository`.
pub struct PickupService<R: PickupRepository> {
    repo: Arc<R>,
}

impl<R: PickupRepository> Clone for PickupService<R> {
    fn clone(&self) -> Self { Self { repo: Arc::clone(&self.repo) } }
}

impl<R: PickupRepository> PickupService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    /// Create a pending pickup.
    ///
    /// # Examples
    /// ```
    /// use service::pickup::{PickupService, domain::NewPickup, repository::mock::MockPickupRepository};
    /// use models::pickup::{PickupStatus, WasteType};
    /// use std::sync::Arc;
    /// let svc = PickupService::new(Arc::new(MockPickupRepository::default()));
    /// let when = models::wire_time::parse("2030-01-01 08:00:00").unwrap();
    /// let new = NewPickup { waste_type: WasteType::Plastic, pickup_location: "1 Main St".into(), pickup_date_time: when, user_name: "ana".into() };
    /// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
    /// let created = rt.block_on(svc.create(new)).unwrap();
    /// assert_eq!(created.status, PickupStatus::Pending);
    /// ```
    #[instrument(skip(self, new), fields(user = %new.user_name, waste_type = new.waste_type.as_str()))]
    pub async fn create(&self, new: NewPickup) -> Result<pickup::Model, ServiceError> {
        new.validate()?;
        let created = self.repo.create(&new).await?;
        info!(id = created.id, "pickup_created");
        Ok(created)
    }

    pub async fn get(&self, id: i32) -> Result<pickup::Model, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("pickup"))
    }

    pub async fn list(&self, filter: &PickupFilter) -> Result<Vec<pickup::Model>, ServiceError> {
        self.repo.list(filter).await
    }

    /// Apply a partial update. Concurrent updates to one id are not coordinated; last write wins.
    ///
    /// The write only lands if the status read is still the stored one; otherwise
    /// the changes are re-applied to a fresh read, so a status set by the sweep
    /// is never rolled back.
    #[instrument(skip(self, changes))]
    pub async fn update(&self, id: i32, changes: PickupChanges) -> Result<pickup::Model, ServiceError> {
        // status can move forward at most twice, so a third read is stable
        for _ in 0..UPDATE_ATTEMPTS {
            let current = self.get(id).await?;
            let next = changes.apply_to(&current)?;
            if next == current {
                debug!("update is a no-op");
                return Ok(current);
            }
            if let Some(updated) = self.repo.replace(&next, current.status).await? {
                info!(id, status = updated.status.as_str(), "pickup_updated");
                return Ok(updated);
            }
            debug!(id, read_status = current.status.as_str(), "pickup changed before write; re-reading");
        }
        Err(ServiceError::Validation(format!("pickup {id} kept changing during update")))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        if !self.repo.delete(id).await? {
            return Err(ServiceError::not_found("pickup"));
        }
        info!(id, "pickup_deleted");
        Ok(())
    }

    /// Complete every overdue pickup as of the current wall clock.
    pub async fn sweep_completed(&self) -> Result<u64, ServiceError> {
        self.sweep_completed_at(pickup::now()).await
    }

    pub async fn sweep_completed_at(&self, now: DateTime) -> Result<u64, ServiceError> {
        self.repo.complete_overdue(now).await
    }

    pub async fn environmental_impact(&self) -> Result<ImpactReport, ServiceError> {
        let filter = PickupFilter { status: Some(PickupStatus::Completed), ..Default::default() };
        let completed = self.repo.list(&filter).await?;
        Ok(ImpactReport::from_pickups(&completed))
    }
}
