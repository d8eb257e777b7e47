use serde::{Deserialize, Serialize};

use super::entity::Post;

/// Published after a post is persisted. Open timelines reload on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostCreated {
	pub post_id: Option<i64>,
	pub user_id: Option<String>,
}

impl From<&Post> for PostCreated {
	fn from(value: &Post) -> Self {
		Self {
			post_id: value.id,
			user_id: value.user_id.clone(),
		}
	}
}
