use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const ANONYMOUS_NICKNAME: &str = "Anonymous";

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
	pub id: Option<i64>,
	pub user_id: Option<String>,
	pub content: String,
	pub created_at: Option<DateTime<Utc>>,
	pub image_url: Option<String>,
}

#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize, sqlx::FromRow)]
pub struct Profile {
	pub id: Option<i64>,
	pub user_id: String,
	pub nickname: Option<String>,
	pub created_at: Option<DateTime<Utc>>,
	pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
	pub fn new(user_id: impl Into<String>) -> Self {
		Self {
			user_id: user_id.into(),
			..Default::default()
		}
	}

	pub fn display_name(&self) -> &str {
		match self.nickname.as_deref() {
			Some(nickname) if !nickname.is_empty() => nickname,
			_ => ANONYMOUS_NICKNAME,
		}
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub struct LikeState {
	pub liked: bool,
	pub count: i64,
}

/// A post as rendered in a timeline row, resolved for one viewer.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct PostCard {
	pub post: Post,
	pub nickname: String,
	pub like_count: i64,
	pub is_liked: bool,
}
