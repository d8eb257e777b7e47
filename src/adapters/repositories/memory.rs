use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use crate::{
	domain::post::{commands::CreatePost, Post, Profile},
	services::response::ServiceError,
};

use super::{LikeRepository, PostRepository, ProfileRepository};

#[derive(Default)]
struct Tables {
	posts: Vec<Post>,
	profiles: HashMap<String, Profile>,
	likes: HashSet<(i64, String)>,
	next_id: i64,
}

impl Tables {
	fn next_id(&mut self) -> i64 {
		self.next_id += 1;
		self.next_id
	}

	// Creation stamps are strictly increasing so the feed order is total.
	fn next_timestamp(&self) -> DateTime<Utc> {
		let now = Utc::now();
		match self.posts.iter().filter_map(|post| post.created_at).max() {
			Some(latest) if latest >= now => latest + Duration::microseconds(1),
			_ => now,
		}
	}
}

/// Process-local store used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryRepository {
	tables: RwLock<Tables>,
}

impl MemoryRepository {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seeds the store with already persisted posts. Posts without an id get one.
	pub fn with_posts(posts: impl IntoIterator<Item = Post>) -> Self {
		let mut tables = Tables::default();
		for mut post in posts {
			match post.id {
				Some(id) => tables.next_id = tables.next_id.max(id),
				None => post.id = Some(tables.next_id()),
			}
			tables.posts.push(post);
		}
		Self {
			tables: RwLock::new(tables),
		}
	}
}

#[async_trait]
impl PostRepository for MemoryRepository {
	async fn fetch_posts(
		&self,
		before: DateTime<Utc>,
		before_id: Option<i64>,
		limit: usize,
	) -> Result<Vec<Post>, ServiceError> {
		let tables = self.tables.read().await;
		let mut page: Vec<Post> = tables
			.posts
			.iter()
			.filter(|post| match (post.created_at, before_id) {
				(None, _) => false,
				(Some(created_at), None) => created_at <= before,
				(Some(created_at), Some(before_id)) => (created_at, post.id) < (before, Some(before_id)),
			})
			.cloned()
			.collect();
		page.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
		page.truncate(limit);
		Ok(page)
	}

	async fn get_post(
		&self,
		post_id: i64,
	) -> Result<Post, ServiceError> {
		self.tables
			.read()
			.await
			.posts
			.iter()
			.find(|post| post.id == Some(post_id))
			.cloned()
			.ok_or(ServiceError::EntityNotFound)
	}

	async fn add_post(
		&self,
		command: CreatePost,
	) -> Result<Post, ServiceError> {
		let mut tables = self.tables.write().await;
		let post = Post {
			id: Some(tables.next_id()),
			user_id: Some(command.user_id),
			content: command.content,
			created_at: Some(tables.next_timestamp()),
			image_url: command.image_url,
		};
		tables.posts.push(post.clone());
		Ok(post)
	}
}

#[async_trait]
impl ProfileRepository for MemoryRepository {
	async fn get_profile(
		&self,
		user_id: &str,
	) -> Result<Option<Profile>, ServiceError> {
		Ok(self.tables.read().await.profiles.get(user_id).cloned())
	}

	async fn add_profile(
		&self,
		user_id: &str,
	) -> Result<Profile, ServiceError> {
		let mut tables = self.tables.write().await;
		if let Some(existing) = tables.profiles.get(user_id) {
			return Ok(existing.clone());
		}
		let profile = Profile {
			id: Some(tables.next_id()),
			created_at: Some(Utc::now()),
			..Profile::new(user_id)
		};
		tables.profiles.insert(user_id.to_string(), profile.clone());
		Ok(profile)
	}

	async fn update_profile(
		&self,
		user_id: &str,
		nickname: &str,
	) -> Result<Profile, ServiceError> {
		let mut tables = self.tables.write().await;
		let profile = tables.profiles.get_mut(user_id).ok_or(ServiceError::EntityNotFound)?;
		profile.nickname = Some(nickname.to_string());
		profile.updated_at = Some(Utc::now());
		Ok(profile.clone())
	}
}

#[async_trait]
impl LikeRepository for MemoryRepository {
	async fn add_like(
		&self,
		post_id: i64,
		user_id: &str,
	) -> Result<(), ServiceError> {
		self.tables.write().await.likes.insert((post_id, user_id.to_string()));
		Ok(())
	}

	async fn remove_like(
		&self,
		post_id: i64,
		user_id: &str,
	) -> Result<(), ServiceError> {
		self.tables.write().await.likes.remove(&(post_id, user_id.to_string()));
		Ok(())
	}

	async fn like_count(
		&self,
		post_id: i64,
	) -> Result<i64, ServiceError> {
		let count = self.tables.read().await.likes.iter().filter(|(id, _)| *id == post_id).count();
		Ok(count as i64)
	}

	async fn is_liked(
		&self,
		post_id: i64,
		user_id: &str,
	) -> Result<bool, ServiceError> {
		Ok(self.tables.read().await.likes.contains(&(post_id, user_id.to_string())))
	}
}
