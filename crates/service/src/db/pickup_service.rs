use sea_orm::{
    sea_query::Expr, ColumnTrait, DatabaseConnection, EntityTrait, NotSet, QueryFilter, QueryOrder, Set,
};
use sea_orm::prelude::DateTime;
use models::pickup::{self, Entity as PickupEntity, PickupStatus};

use crate::errors::ServiceError;
use crate::pickup::domain::{NewPickup, PickupFilter};

/// Insert a pickup; the store assigns the id.
pub async fn create_pickup(db: &DatabaseConnection, new: &NewPickup) -> Result<pickup::Model, ServiceError> {
    // validations are in models::pickup
    let created = pickup::create(db, new.waste_type, &new.pickup_location, new.pickup_date_time, &new.user_name).await?;
    Ok(created)
}

/// Get a pickup by id.
pub async fn get_pickup(db: &DatabaseConnection, id: i32) -> Result<Option<pickup::Model>, ServiceError> {
    let found = PickupEntity::find_by_id(id).one(db).await?;
    Ok(found)
}

/// List pickups matching the filter, in id order.
pub async fn list_pickups(db: &DatabaseConnection, filter: &PickupFilter) -> Result<Vec<pickup::Model>, ServiceError> {
    let mut finder = PickupEntity::find();
    if let Some(status) = filter.status { finder = finder.filter(pickup::Column::Status.eq(status)); }
    if let Some(user) = &filter.user_name { finder = finder.filter(pickup::Column::UserName.eq(user.as_str())); }
    let rows = finder.order_by_asc(pickup::Column::Id).all(db).await?;
    Ok(rows)
}

/// Overwrite every mutable column of an existing row, but only while its
/// stored status is still `expected_status`.
///
/// `id` and `creation_timestamp` are never written. `None` means no row
/// matched: the id is gone or its status moved since it was read.
pub async fn replace_pickup(
    db: &DatabaseConnection,
    row: &pickup::Model,
    expected_status: PickupStatus,
) -> Result<Option<pickup::Model>, ServiceError> {
    let am = pickup::ActiveModel {
        id: NotSet,
        waste_type: Set(row.waste_type),
        pickup_location: Set(row.pickup_location.clone()),
        pickup_date_time: Set(row.pickup_date_time),
        status: Set(row.status),
        user_name: Set(row.user_name.clone()),
        creation_timestamp: NotSet,
    };
    let res = PickupEntity::update_many()
        .set(am)
        .filter(pickup::Column::Id.eq(row.id))
        .filter(pickup::Column::Status.eq(expected_status))
        .exec(db)
        .await?;
    if res.rows_affected == 0 {
        return Ok(None);
    }
    get_pickup(db, row.id).await
}

/// Delete a pickup; returns true if deleted.
pub async fn delete_pickup(db: &DatabaseConnection, id: i32) -> Result<bool, ServiceError> {
    let res = PickupEntity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}

/// Mark every unfinished pickup scheduled strictly before `now` as completed.
pub async fn complete_overdue_pickups(db: &DatabaseConnection, now: DateTime) -> Result<u64, ServiceError> {
    let res = PickupEntity::update_many()
        .col_expr(pickup::Column::Status, Expr::value(PickupStatus::Completed))
        .filter(pickup::Column::Status.ne(PickupStatus::Completed))
        .filter(pickup::Column::PickupDateTime.lt(now))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
