use std::fmt::Display;

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;

use crate::domain::post::{LikeState, Post, PostCard, Profile};

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ServiceResponse {
	Post(Post),
	Card(PostCard),
	Profile(Profile),
	Like(LikeState),
}

impl From<Post> for ServiceResponse {
	fn from(value: Post) -> Self {
		ServiceResponse::Post(value)
	}
}
impl From<PostCard> for ServiceResponse {
	fn from(value: PostCard) -> Self {
		ServiceResponse::Card(value)
	}
}
impl From<Profile> for ServiceResponse {
	fn from(value: Profile) -> Self {
		ServiceResponse::Profile(value)
	}
}
impl From<LikeState> for ServiceResponse {
	fn from(value: LikeState) -> Self {
		ServiceResponse::Like(value)
	}
}

impl IntoResponse for ServiceResponse {
	fn into_response(self) -> Response {
		(StatusCode::OK, Json(self)).into_response()
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
	/// Network or backend error while loading a feed page.
	FetchFailure(String),
	Database(String),
	EntityNotFound,
	BadRequest(String),
	ParsingError,
	UserCloseConnection,
	Config(String),
}

impl std::error::Error for ServiceError {}

impl Display for ServiceError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ServiceError::FetchFailure(res) => write!(f, "FetchFailure: {}", res),
			ServiceError::Database(res) => write!(f, "Database: {}", res),
			ServiceError::EntityNotFound => write!(f, "EntityNotFound"),
			ServiceError::BadRequest(res) => write!(f, "BadRequest: {}", res),
			ServiceError::ParsingError => write!(f, "ParsingError"),
			ServiceError::UserCloseConnection => write!(f, "UserCloseConnection"),
			ServiceError::Config(res) => write!(f, "Config: {}", res),
		}
	}
}

impl From<sqlx::Error> for ServiceError {
	fn from(value: sqlx::Error) -> Self {
		match value {
			sqlx::Error::RowNotFound => ServiceError::EntityNotFound,
			err => ServiceError::Database(err.to_string()),
		}
	}
}

impl From<serde_json::Error> for ServiceError {
	fn from(_value: serde_json::Error) -> Self {
		ServiceError::ParsingError
	}
}

impl IntoResponse for ServiceError {
	fn into_response(self) -> Response {
		let status = match &self {
			ServiceError::EntityNotFound => StatusCode::NOT_FOUND,
			ServiceError::BadRequest(_) | ServiceError::ParsingError => StatusCode::BAD_REQUEST,
			ServiceError::FetchFailure(_) => StatusCode::BAD_GATEWAY,
			ServiceError::UserCloseConnection => StatusCode::GONE,
			ServiceError::Database(_) | ServiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
		};
		if status.is_server_error() {
			tracing::error!("request failed: {}", self);
		}
		(status, self.to_string()).into_response()
	}
}

#[cfg(test)]
mod test {
	use axum::{http::StatusCode, response::IntoResponse};

	use super::ServiceError;

	#[test]
	fn test_error_status_mapping() {
		assert_eq!(ServiceError::EntityNotFound.into_response().status(), StatusCode::NOT_FOUND);
		assert_eq!(ServiceError::BadRequest("x".into()).into_response().status(), StatusCode::BAD_REQUEST);
		assert_eq!(ServiceError::Database("x".into()).into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
	}

	#[test]
	fn test_row_not_found_maps_to_entity_not_found() {
		assert_eq!(ServiceError::from(sqlx::Error::RowNotFound), ServiceError::EntityNotFound);
	}
}
