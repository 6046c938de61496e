use models::pickup::{self, PickupStatus, WasteType};
use models::wire_time;
use sea_orm::prelude::DateTime;
use serde::Deserialize;

use crate::errors::ServiceError;

/// Validated input for a new pickup request.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPickup {
    pub waste_type: WasteType,
    pub pickup_location: String,
    pub pickup_date_time: DateTime,
    pub user_name: String,
}

/// Fields to overwrite on an existing pickup; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickupChanges {
    pub waste_type: Option<WasteType>,
    pub pickup_location: Option<String>,
    pub pickup_date_time: Option<DateTime>,
    pub status: Option<PickupStatus>,
    pub user_name: Option<String>,
}

/// List filter; both criteria combine with AND.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PickupFilter {
    pub status: Option<PickupStatus>,
    pub user_name: Option<String>,
}

/// Raw create payload as it arrives on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePickupInput {
    pub waste_type: Option<String>,
    pub pickup_location: Option<String>,
    pub pickup_date_time: Option<String>,
    pub user_name: Option<String>,
}

/// Raw partial update payload as it arrives on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePickupInput {
    pub waste_type: Option<String>,
    pub pickup_location: Option<String>,
    pub pickup_date_time: Option<String>,
    pub status: Option<String>,
    pub user_name: Option<String>,
}

fn required(field: &str, value: Option<String>) -> Result<String, ServiceError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ServiceError::Validation(format!("missing required field: {field}"))),
    }
}

fn parse_date_time(raw: &str) -> Result<DateTime, ServiceError> {
    wire_time::parse(raw).ok_or_else(|| {
        ServiceError::Validation(format!(
            "invalid pickupDateTime '{raw}', expected YYYY-MM-DD HH:MM:SS"
        ))
    })
}

impl TryFrom<CreatePickupInput> for NewPickup {
    type Error = ServiceError;

    fn try_from(input: CreatePickupInput) -> Result<Self, Self::Error> {
        let waste_type = required("wasteType", input.waste_type)?.parse::<WasteType>()?;
        let pickup_location = required("pickupLocation", input.pickup_location)?;
        let pickup_date_time = parse_date_time(&required("pickupDateTime", input.pickup_date_time)?)?;
        let user_name = required("userName", input.user_name)?;
        Ok(NewPickup { waste_type, pickup_location, pickup_date_time, user_name })
    }
}

impl TryFrom<UpdatePickupInput> for PickupChanges {
    type Error = ServiceError;

    fn try_from(input: UpdatePickupInput) -> Result<Self, Self::Error> {
        Ok(PickupChanges {
            waste_type: input.waste_type.map(|s| s.parse()).transpose()?,
            pickup_location: input.pickup_location,
            pickup_date_time: input.pickup_date_time.as_deref().map(parse_date_time).transpose()?,
            status: input.status.map(|s| s.parse()).transpose()?,
            user_name: input.user_name,
        })
    }
}

impl NewPickup {
    pub fn validate(&self) -> Result<(), ServiceError> {
        pickup::validate_required("pickupLocation", &self.pickup_location)?;
        pickup::validate_required("userName", &self.user_name)?;
        Ok(())
    }
}

impl PickupChanges {
    pub fn is_empty(&self) -> bool {
        *self == PickupChanges::default()
    }

    /// Produce the updated record, re-checking every invariant the row must hold.
    pub fn apply_to(&self, current: &pickup::Model) -> Result<pickup::Model, ServiceError> {
        let mut next = current.clone();
        if let Some(t) = self.waste_type { next.waste_type = t; }
        if let Some(l) = &self.pickup_location { next.pickup_location = l.clone(); }
        if let Some(d) = self.pickup_date_time { next.pickup_date_time = d; }
        if let Some(s) = self.status {
            pickup::validate_transition(current.status, s)?;
            next.status = s;
        }
        if let Some(u) = &self.user_name { next.user_name = u.clone(); }

        pickup::validate_required("pickupLocation", &next.pickup_location)?;
        pickup::validate_required("userName", &next.user_name)?;
        Ok(next)
    }
}
