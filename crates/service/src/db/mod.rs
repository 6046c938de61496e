//! SeaORM data access for pickups, one function per store operation.

pub mod pickup_service;
