use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
	domain::post::{commands::CreatePost, Post},
	services::response::ServiceError,
};

use super::{PostRepository, Repository};

#[async_trait]
impl PostRepository for Repository {
	async fn fetch_posts(
		&self,
		before: DateTime<Utc>,
		before_id: Option<i64>,
		limit: usize,
	) -> Result<Vec<Post>, ServiceError> {
		sqlx::query_as::<_, Post>(
			r#"
			SELECT id, user_id, content, created_at, image_url
			FROM post
			WHERE ($2::BIGINT IS NULL AND created_at <= $1)
				OR (created_at, id) < ($1, $2)
			ORDER BY created_at DESC, id DESC
			LIMIT $3
			"#,
		)
		.bind(before)
		.bind(before_id)
		.bind(limit as i64)
		.fetch_all(&self.executor)
		.await
		.map_err(|err| {
			tracing::error!("Fetching posts before {} failed: {:?}", before, err);
			ServiceError::FetchFailure(err.to_string())
		})
	}

	async fn get_post(
		&self,
		post_id: i64,
	) -> Result<Post, ServiceError> {
		let post = sqlx::query_as::<_, Post>(
			r#"
			SELECT id, user_id, content, created_at, image_url
			FROM post
			WHERE id = $1
			"#,
		)
		.bind(post_id)
		.fetch_one(&self.executor)
		.await?;
		Ok(post)
	}

	async fn add_post(
		&self,
		command: CreatePost,
	) -> Result<Post, ServiceError> {
		let post = sqlx::query_as::<_, Post>(
			r#"
			INSERT INTO post (user_id, content, image_url)
			VALUES ($1, $2, $3)
			RETURNING id, user_id, content, created_at, image_url
			"#,
		)
		.bind(command.user_id)
		.bind(command.content)
		.bind(command.image_url)
		.fetch_one(&self.executor)
		.await?;
		Ok(post)
	}
}
