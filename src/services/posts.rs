use crate::domain::{
	post::{
		commands::{CreatePost, UpdateProfile},
		events::PostCreated,
		LikeState, Post, PostCard, Profile,
	},
	timeline::TimelineStateWrapper,
};

use super::response::ServiceError;

pub struct PostHandler;
impl PostHandler {
	pub async fn create_post(
		command: CreatePost,
		state: TimelineStateWrapper,
	) -> Result<Post, ServiceError> {
		let command = command.validated()?;
		let post = state.repositories.posts.add_post(command).await?;
		tracing::info!(post_id = ?post.id, "post created");
		state.publish(PostCreated::from(&post));
		Ok(post)
	}

	/// Resolves a post for display: author nickname and the viewer's like state.
	pub async fn post_card(
		post_id: i64,
		viewer: &str,
		state: TimelineStateWrapper,
	) -> Result<PostCard, ServiceError> {
		let post = state.repositories.posts.get_post(post_id).await?;
		let nickname = match post.user_id.as_deref() {
			Some(author) => state.repositories.profiles.get_profile(author).await?.unwrap_or_else(|| Profile::new(author)),
			None => Profile::default(),
		}
		.display_name()
		.to_string();
		let like = PostHandler::like_state(post_id, viewer, state).await?;

		Ok(PostCard {
			post,
			nickname,
			like_count: like.count,
			is_liked: like.liked,
		})
	}

	pub async fn like_state(
		post_id: i64,
		user_id: &str,
		state: TimelineStateWrapper,
	) -> Result<LikeState, ServiceError> {
		let likes = &state.repositories.likes;
		Ok(LikeState {
			liked: likes.is_liked(post_id, user_id).await?,
			count: likes.like_count(post_id).await?,
		})
	}

	/// Likes the post, or takes the like back if the user already liked it.
	pub async fn toggle_like(
		post_id: i64,
		user_id: &str,
		state: TimelineStateWrapper,
	) -> Result<LikeState, ServiceError> {
		// 404 rather than a dangling like
		state.repositories.posts.get_post(post_id).await?;

		let likes = &state.repositories.likes;
		if likes.is_liked(post_id, user_id).await? {
			likes.remove_like(post_id, user_id).await?;
		} else {
			likes.add_like(post_id, user_id).await?;
		}
		PostHandler::like_state(post_id, user_id, state.clone()).await
	}

	pub async fn get_profile(
		user_id: &str,
		state: TimelineStateWrapper,
	) -> Result<Profile, ServiceError> {
		state.repositories.profiles.get_profile(user_id).await?.ok_or(ServiceError::EntityNotFound)
	}

	pub async fn register_profile(
		user_id: &str,
		state: TimelineStateWrapper,
	) -> Result<Profile, ServiceError> {
		state.repositories.profiles.add_profile(user_id).await
	}

	pub async fn update_profile(
		user_id: &str,
		command: UpdateProfile,
		state: TimelineStateWrapper,
	) -> Result<Profile, ServiceError> {
		let command = command.validated()?;
		state.repositories.profiles.update_profile(user_id, &command.nickname).await
	}
}
