use async_trait::async_trait;

use crate::{domain::post::Profile, services::response::ServiceError};

use super::{ProfileRepository, Repository};

#[async_trait]
impl ProfileRepository for Repository {
	async fn get_profile(
		&self,
		user_id: &str,
	) -> Result<Option<Profile>, ServiceError> {
		let profile = sqlx::query_as::<_, Profile>(
			r#"
			SELECT id, user_id, nickname, created_at, updated_at
			FROM profile
			WHERE user_id = $1
			"#,
		)
		.bind(user_id)
		.fetch_optional(&self.executor)
		.await?;
		Ok(profile)
	}

	async fn add_profile(
		&self,
		user_id: &str,
	) -> Result<Profile, ServiceError> {
		sqlx::query(
			r#"
			INSERT INTO profile (user_id)
			VALUES ($1)
			ON CONFLICT (user_id) DO NOTHING
			"#,
		)
		.bind(user_id)
		.execute(&self.executor)
		.await?;

		self.get_profile(user_id).await?.ok_or(ServiceError::EntityNotFound)
	}

	async fn update_profile(
		&self,
		user_id: &str,
		nickname: &str,
	) -> Result<Profile, ServiceError> {
		let profile = sqlx::query_as::<_, Profile>(
			r#"
			UPDATE profile
			SET nickname = $2, updated_at = now()
			WHERE user_id = $1
			RETURNING id, user_id, nickname, created_at, updated_at
			"#,
		)
		.bind(user_id)
		.bind(nickname)
		.fetch_optional(&self.executor)
		.await?;
		profile.ok_or(ServiceError::EntityNotFound)
	}
}
