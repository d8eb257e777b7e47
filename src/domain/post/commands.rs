use serde::{Deserialize, Serialize};

use crate::services::response::ServiceError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePost {
	#[serde(default)]
	pub user_id: String,
	pub content: String,
	#[serde(default)]
	pub image_url: Option<String>,
}

impl CreatePost {
	/// Trims the content and rejects empty posts.
	pub fn validated(mut self) -> Result<Self, ServiceError> {
		if self.user_id.trim().is_empty() {
			return Err(ServiceError::BadRequest("user id is required".into()));
		}
		let trimmed = self.content.trim();
		if trimmed.is_empty() {
			return Err(ServiceError::BadRequest("post content must not be empty".into()));
		}
		self.content = trimmed.to_string();
		self.image_url = self.image_url.filter(|url| !url.trim().is_empty());
		Ok(self)
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateProfile {
	pub nickname: String,
}

impl UpdateProfile {
	pub fn validated(self) -> Result<Self, ServiceError> {
		let nickname = self.nickname.trim();
		if nickname.is_empty() {
			return Err(ServiceError::BadRequest("nickname must not be empty".into()));
		}
		Ok(Self {
			nickname: nickname.to_string(),
		})
	}
}
