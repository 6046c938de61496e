//! Pickup module: three-layer architecture (domain, repository, service),
//! plus the environmental impact aggregation over completed pickups.

pub mod domain;
pub mod impact;
pub mod repository;
pub mod service;

pub use service::PickupService;
