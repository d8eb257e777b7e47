use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::services::response::ServiceError;

pub async fn connect(
	url: &str,
	max_connections: u32,
) -> Result<PgPool, ServiceError> {
	PgPoolOptions::new().max_connections(max_connections).connect(url).await.map_err(|err| {
		tracing::error!("Error occurred while connecting to database: {:?}", err);
		ServiceError::Database(err.to_string())
	})
}

/// Creates the `post`, `profile` and `like` tables if they are missing.
pub async fn migrate(pool: &PgPool) -> Result<(), ServiceError> {
	sqlx::migrate!("./migrations")
		.run(pool)
		.await
		.map_err(|err| ServiceError::Database(err.to_string()))
}
