//! Service layer providing pickup business operations on top of models.
//! - Separates business logic from data access (`PickupRepository`).
//! - Reuses validation and entity definitions in `models` crate.
//! - Owns the periodic completion sweep.

pub mod errors;
pub mod db;
pub mod pickup;
pub mod sweeper;
#[cfg(test)]
pub mod test_support;

pub use pickup::PickupService;
