use sea_orm::DatabaseConnection;

/// Fresh in-memory SQLite database with migrations applied.
///
/// Each call returns an isolated store, so tests never see each other's rows.
pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    models::db::connect_in_memory().await
}
