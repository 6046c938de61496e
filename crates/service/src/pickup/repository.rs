use async_trait::async_trait;
use models::pickup::PickupStatus;
use sea_orm::{prelude::DateTime, DatabaseConnection};

use super::domain::{NewPickup, PickupFilter};
use crate::errors::ServiceError;

/// Persistence abstraction for pickup requests.
#[async_trait]
pub trait PickupRepository: Send + Sync {
    async fn create(&self, new: &NewPickup) -> Result<models::pickup::Model, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<models::pickup::Model>, ServiceError>;
    async fn list(&self, filter: &PickupFilter) -> Result<Vec<models::pickup::Model>, ServiceError>;
    /// Full row replace, applied only while the stored status equals
    /// `expected_status`; `None` if nothing matched.
    async fn replace(
        &self,
        row: &models::pickup::Model,
        expected_status: PickupStatus,
    ) -> Result<Option<models::pickup::Model>, ServiceError>;
    async fn delete(&self, id: i32) -> Result<bool, ServiceError>;
    /// Complete every non-completed row scheduled before `now`; returns rows changed.
    async fn complete_overdue(&self, now: DateTime) -> Result<u64, ServiceError>;
}

/// SeaORM-backed repository implementation.
#[derive(Clone)]
pub struct SeaOrmPickupRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmPickupRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

#[async_trait]
impl PickupRepository for SeaOrmPickupRepository {
    async fn create(&self, new: &NewPickup) -> Result<models::pickup::Model, ServiceError> {
        crate::db::pickup_service::create_pickup(&self.db, new).await
    }

    async fn get(&self, id: i32) -> Result<Option<models::pickup::Model>, ServiceError> {
        crate::db::pickup_service::get_pickup(&self.db, id).await
    }

    async fn list(&self, filter: &PickupFilter) -> Result<Vec<models::pickup::Model>, ServiceError> {
        crate::db::pickup_service::list_pickups(&self.db, filter).await
    }

    async fn replace(
        &self,
        row: &models::pickup::Model,
        expected_status: PickupStatus,
    ) -> Result<Option<models::pickup::Model>, ServiceError> {
        crate::db::pickup_service::replace_pickup(&self.db, row, expected_status).await
    }

    async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
        crate::db::pickup_service::delete_pickup(&self.db, id).await
    }

    async fn complete_overdue(&self, now: DateTime) -> Result<u64, ServiceError> {
        crate::db::pickup_service::complete_overdue_pickups(&self.db, now).await
    }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use models::pickup::Model;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockPickupRepository {
        rows: Mutex<BTreeMap<i32, Model>>,
        next_id: AtomicU32,
        sweep_calls: AtomicUsize,
        failing_sweeps: AtomicU32,
    }

    impl MockPickupRepository {
        /// Make the next `n` sweeps fail with a database error.
        pub fn fail_next_sweeps(&self, n: u32) {
            self.failing_sweeps.store(n, Ordering::SeqCst);
        }

        pub fn sweep_calls(&self) -> usize {
            self.sweep_calls.load(Ordering::SeqCst)
        }

        pub fn len(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    #[async_trait]
    impl PickupRepository for MockPickupRepository {
        async fn create(&self, new: &NewPickup) -> Result<Model, ServiceError> {
            new.validate()?;
            let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i32 + 1;
            let row = Model {
                id,
                waste_type: new.waste_type,
                pickup_location: new.pickup_location.clone(),
                pickup_date_time: new.pickup_date_time,
                status: PickupStatus::Pending,
                user_name: new.user_name.clone(),
                creation_timestamp: models::pickup::now(),
            };
            self.rows.lock().unwrap().insert(id, row.clone());
            Ok(row)
        }

        async fn get(&self, id: i32) -> Result<Option<Model>, ServiceError> {
            Ok(self.rows.lock().unwrap().get(&id).cloned())
        }

        async fn list(&self, filter: &PickupFilter) -> Result<Vec<Model>, ServiceError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .values()
                .filter(|r| filter.status.map_or(true, |s| r.status == s))
                .filter(|r| filter.user_name.as_deref().map_or(true, |u| r.user_name == u))
                .cloned()
                .collect())
        }

        async fn replace(&self, row: &Model, expected_status: PickupStatus) -> Result<Option<Model>, ServiceError> {
            let mut rows = self.rows.lock().unwrap();
            let Some(existing) = rows.get_mut(&row.id).filter(|r| r.status == expected_status) else {
                return Ok(None);
            };
            let creation_timestamp = existing.creation_timestamp;
            *existing = Model { creation_timestamp, ..row.clone() };
            Ok(Some(existing.clone()))
        }

        async fn delete(&self, id: i32) -> Result<bool, ServiceError> {
            Ok(self.rows.lock().unwrap().remove(&id).is_some())
        }

        async fn complete_overdue(&self, now: DateTime) -> Result<u64, ServiceError> {
            self.sweep_calls.fetch_add(1, Ordering::SeqCst);
            let failing = self.failing_sweeps.load(Ordering::SeqCst);
            if failing > 0 {
                self.failing_sweeps.store(failing - 1, Ordering::SeqCst);
                return Err(ServiceError::Db("simulated sweep failure".into()));
            }
            let mut rows = self.rows.lock().unwrap();
            let mut changed = 0;
            for row in rows.values_mut() {
                if row.status != PickupStatus::Completed && row.pickup_date_time < now {
                    row.status = PickupStatus::Completed;
                    changed += 1;
                }
            }
            Ok(changed)
        }
    }
}
