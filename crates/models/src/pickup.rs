use std::str::FromStr;

use chrono::{Local, Timelike};
use sea_orm::{entity::prelude::*, ActiveModelTrait, DatabaseConnection, NotSet, Set};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors;

/// A single scheduled waste-collection job.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "waste_pickups")]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub waste_type: WasteType,
    pub pickup_location: String,
    #[serde(with = "crate::wire_time")]
    pub pickup_date_time: DateTime,
    pub status: PickupStatus,
    pub user_name: String,
    #[serde(with = "crate::wire_time")]
    pub creation_timestamp: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum WasteType {
    #[sea_orm(string_value = "Plastic")]
    Plastic,
    #[sea_orm(string_value = "Electronic")]
    Electronic,
    #[sea_orm(string_value = "Organic")]
    Organic,
    #[sea_orm(string_value = "Hazardous")]
    Hazardous,
}

/// Declaration order is lifecycle order; `Ord` is used to reject backward moves.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PickupStatus {
    #[sea_orm(string_value = "Pending")]
    Pending,
    #[sea_orm(string_value = "Scheduled")]
    Scheduled,
    #[sea_orm(string_value = "Completed")]
    Completed,
}

impl WasteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WasteType::Plastic => "Plastic",
            WasteType::Electronic => "Electronic",
            WasteType::Organic => "Organic",
            WasteType::Hazardous => "Hazardous",
        }
    }
}

impl PickupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickupStatus::Pending => "Pending",
            PickupStatus::Scheduled => "Scheduled",
            PickupStatus::Completed => "Completed",
        }
    }

    /// Forward-only lifecycle; staying put is allowed.
    pub fn can_transition_to(self, next: PickupStatus) -> bool {
        next >= self
    }
}

impl FromStr for WasteType {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plastic" => Ok(WasteType::Plastic),
            "electronic" => Ok(WasteType::Electronic),
            "organic" => Ok(WasteType::Organic),
            "hazardous" => Ok(WasteType::Hazardous),
            _ => Err(errors::ModelError::Validation(format!(
                "invalid wasteType '{s}', expected one of Plastic, Electronic, Organic, Hazardous"
            ))),
        }
    }
}

impl FromStr for PickupStatus {
    type Err = errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(PickupStatus::Pending),
            "scheduled" => Ok(PickupStatus::Scheduled),
            "completed" => Ok(PickupStatus::Completed),
            _ => Err(errors::ModelError::Validation(format!(
                "invalid status '{s}', expected one of Pending, Scheduled, Completed"
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for WasteType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for PickupStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Local wall-clock time at second precision, the resolution of the wire format.
pub fn now() -> DateTime {
    let dt = Local::now().naive_local();
    dt.with_nanosecond(0).unwrap_or(dt)
}

pub fn validate_required(field: &str, value: &str) -> Result<(), errors::ModelError> {
    if value.trim().is_empty() {
        return Err(errors::ModelError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}

pub fn validate_transition(from: PickupStatus, to: PickupStatus) -> Result<(), errors::ModelError> {
    if !from.can_transition_to(to) {
        return Err(errors::ModelError::Validation(format!(
            "status cannot move backward from {} to {}",
            from.as_str(),
            to.as_str()
        )));
    }
    Ok(())
}

/// Insert a new pending pickup after validation.
pub async fn create(
    db: &DatabaseConnection,
    waste_type: WasteType,
    pickup_location: &str,
    pickup_date_time: DateTime,
    user_name: &str,
) -> Result<Model, errors::ModelError> {
    validate_required("pickupLocation", pickup_location)?;
    validate_required("userName", user_name)?;

    let am = ActiveModel {
        id: NotSet,
        waste_type: Set(waste_type),
        pickup_location: Set(pickup_location.to_string()),
        pickup_date_time: Set(pickup_date_time),
        status: Set(PickupStatus::Pending),
        user_name: Set(user_name.to_string()),
        creation_timestamp: Set(now()),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}
