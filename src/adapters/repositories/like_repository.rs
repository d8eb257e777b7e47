use async_trait::async_trait;

use crate::services::response::ServiceError;

use super::{LikeRepository, Repository};

#[async_trait]
impl LikeRepository for Repository {
	async fn add_like(
		&self,
		post_id: i64,
		user_id: &str,
	) -> Result<(), ServiceError> {
		sqlx::query(
			r#"
			INSERT INTO "like" (post_id, user_id)
			VALUES ($1, $2)
			ON CONFLICT (post_id, user_id) DO NOTHING
			"#,
		)
		.bind(post_id)
		.bind(user_id)
		.execute(&self.executor)
		.await?;
		Ok(())
	}

	async fn remove_like(
		&self,
		post_id: i64,
		user_id: &str,
	) -> Result<(), ServiceError> {
		sqlx::query(r#"DELETE FROM "like" WHERE post_id = $1 AND user_id = $2"#)
			.bind(post_id)
			.bind(user_id)
			.execute(&self.executor)
			.await?;
		Ok(())
	}

	async fn like_count(
		&self,
		post_id: i64,
	) -> Result<i64, ServiceError> {
		let count: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "like" WHERE post_id = $1"#)
			.bind(post_id)
			.fetch_one(&self.executor)
			.await?;
		Ok(count)
	}

	async fn is_liked(
		&self,
		post_id: i64,
		user_id: &str,
	) -> Result<bool, ServiceError> {
		let liked: bool = sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM "like" WHERE post_id = $1 AND user_id = $2)"#)
			.bind(post_id)
			.bind(user_id)
			.fetch_one(&self.executor)
			.await?;
		Ok(liked)
	}
}
