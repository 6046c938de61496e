use std::collections::BTreeMap;

use models::pickup::{Model, PickupStatus, WasteType};
use serde::Serialize;

/// Estimated yield of one completed pickup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImpactFactor {
    pub recycled_kg: f64,
    pub co2_reduction_kg: f64,
}

pub fn factor(waste_type: WasteType) -> ImpactFactor {
    let (recycled_kg, co2_reduction_kg) = match waste_type {
        WasteType::Plastic => (2.5, 5.0),
        WasteType::Electronic => (5.0, 20.0),
        WasteType::Hazardous => (1.0, 10.0),
        WasteType::Organic => (3.0, 3.0),
    };
    ImpactFactor { recycled_kg, co2_reduction_kg }
}

/// Aggregate environmental metrics over completed pickups.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    pub total_recycled_waste_kg: f64,
    pub co2_reduction_kg: f64,
    pub waste_type_distribution: BTreeMap<WasteType, u64>,
    pub total_completed_pickups: u64,
}

impl ImpactReport {
    /// Fold the given rows; anything not `Completed` is ignored.
    pub fn from_pickups<'a, I>(pickups: I) -> Self
    where
        I: IntoIterator<Item = &'a Model>,
    {
        let mut report = ImpactReport::default();
        for p in pickups.into_iter().filter(|p| p.status == PickupStatus::Completed) {
            let f = factor(p.waste_type);
            report.total_recycled_waste_kg += f.recycled_kg;
            report.co2_reduction_kg += f.co2_reduction_kg;
            *report.waste_type_distribution.entry(p.waste_type).or_insert(0) += 1;
            report.total_completed_pickups += 1;
        }
        report
    }
}
