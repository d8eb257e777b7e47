pub(crate) mod like_repository;
pub mod memory;
pub(crate) mod post_repository;
pub(crate) mod profile_repository;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::post::{commands::CreatePost, Post, Profile};
use crate::services::response::ServiceError;

pub use memory::MemoryRepository;

/// Source of timeline pages.
#[async_trait]
pub trait PostRepository: Send + Sync {
	/// Returns at most `limit` posts older than the keyset `(before, before_id)`,
	/// ordered by `(created_at, id)` descending. Without `before_id` every post
	/// created at or before `before` qualifies. Fewer than `limit` posts means the
	/// store is exhausted.
	async fn fetch_posts(
		&self,
		before: DateTime<Utc>,
		before_id: Option<i64>,
		limit: usize,
	) -> Result<Vec<Post>, ServiceError>;

	async fn get_post(
		&self,
		post_id: i64,
	) -> Result<Post, ServiceError>;

	async fn add_post(
		&self,
		command: CreatePost,
	) -> Result<Post, ServiceError>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
	async fn get_profile(
		&self,
		user_id: &str,
	) -> Result<Option<Profile>, ServiceError>;

	/// Creates an empty profile for `user_id`. Existing profiles are returned untouched.
	async fn add_profile(
		&self,
		user_id: &str,
	) -> Result<Profile, ServiceError>;

	async fn update_profile(
		&self,
		user_id: &str,
		nickname: &str,
	) -> Result<Profile, ServiceError>;
}

#[async_trait]
pub trait LikeRepository: Send + Sync {
	async fn add_like(
		&self,
		post_id: i64,
		user_id: &str,
	) -> Result<(), ServiceError>;

	async fn remove_like(
		&self,
		post_id: i64,
		user_id: &str,
	) -> Result<(), ServiceError>;

	async fn like_count(
		&self,
		post_id: i64,
	) -> Result<i64, ServiceError>;

	async fn is_liked(
		&self,
		post_id: i64,
		user_id: &str,
	) -> Result<bool, ServiceError>;
}

/// Postgres-backed repository. One instance serves posts, profiles and likes.
#[derive(Clone)]
pub struct Repository {
	pub executor: PgPool,
}

impl Repository {
	pub fn new(executor: PgPool) -> Self {
		Self { executor }
	}
}

/// The collaborators a request handler needs, behind trait objects so the
/// in-memory store can stand in for Postgres.
#[derive(Clone)]
pub struct Repositories {
	pub posts: Arc<dyn PostRepository>,
	pub profiles: Arc<dyn ProfileRepository>,
	pub likes: Arc<dyn LikeRepository>,
}

impl Repositories {
	pub fn from_store<S>(store: Arc<S>) -> Self
	where
		S: PostRepository + ProfileRepository + LikeRepository + 'static,
	{
		Self {
			posts: store.clone(),
			profiles: store.clone(),
			likes: store,
		}
	}
}
