use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorDoc {
    #[schema(example = "Validation Error")]
    pub error: String,
    #[schema(example = "missing required field: userName")]
    pub detail: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PickupDoc {
    pub id: i32,
    #[schema(example = "Plastic")]
    pub waste_type: String,
    pub pickup_location: String,
    #[schema(example = "2025-06-01 09:30:00")]
    pub pickup_date_time: String,
    #[schema(example = "Pending")]
    pub status: String,
    pub user_name: String,
    #[schema(example = "2025-05-28 17:02:11")]
    pub creation_timestamp: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePickupDoc {
    /// Plastic, Electronic, Organic or Hazardous
    pub waste_type: String,
    pub pickup_location: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub pickup_date_time: String,
    pub user_name: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePickupDoc {
    pub waste_type: Option<String>,
    pub pickup_location: Option<String>,
    pub pickup_date_time: Option<String>,
    /// Pending, Scheduled or Completed; never backward
    pub status: Option<String>,
    pub user_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReportDoc {
    pub total_recycled_waste_kg: f64,
    pub co2_reduction_kg: f64,
    pub waste_type_distribution: BTreeMap<String, u64>,
    pub total_completed_pickups: u64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::pickups::list,
        crate::routes::pickups::get,
        crate::routes::pickups::create,
        crate::routes::pickups::update,
        crate::routes::pickups::delete,
        crate::routes::pickups::environmental_impact,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorDoc,
            PickupDoc,
            CreatePickupDoc,
            UpdatePickupDoc,
            ImpactReportDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "pickups"),
        (name = "impact")
    )
)]
pub struct ApiDoc;
