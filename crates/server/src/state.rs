use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::pickup::repository::SeaOrmPickupRepository;
use service::PickupService;

pub type Pickups = PickupService<SeaOrmPickupRepository>;

/// Shared handler state; cheap to clone per request.
#[derive(Clone)]
pub struct ServerState {
    pub pickups: Pickups,
}

impl ServerState {
    pub fn new(db: DatabaseConnection) -> Self {
        let repo = Arc::new(SeaOrmPickupRepository::new(db));
        Self { pickups: PickupService::new(repo) }
    }
}
