use serde::{Deserialize, Serialize};

use crate::{domain::feed::FeedSnapshot, services::response::ServiceError};

/// What a connected timeline sends us.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum ClientMessage {
	Visible { index: usize },
	Reload,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub enum ServerMessage {
	Feed(FeedSnapshot),
	Error { message: String },
}

impl From<FeedSnapshot> for ServerMessage {
	fn from(value: FeedSnapshot) -> Self {
		Self::Feed(value)
	}
}

impl From<&ServiceError> for ServerMessage {
	fn from(value: &ServiceError) -> Self {
		Self::Error {
			message: value.to_string(),
		}
	}
}

impl TryFrom<axum::extract::ws::Message> for ClientMessage {
	type Error = ServiceError;
	fn try_from(value: axum::extract::ws::Message) -> Result<Self, Self::Error> {
		match value {
			axum::extract::ws::Message::Text(string_value) => {
				serde_json::from_str::<ClientMessage>(&string_value).map_err(|_err| ServiceError::ParsingError)
			}

			axum::extract::ws::Message::Close(_close_frame) => Err(ServiceError::UserCloseConnection),
			_ => Err(ServiceError::BadRequest("expected a text frame".into())),
		}
	}
}

impl ServerMessage {
	pub fn to_frame(&self) -> Result<axum::extract::ws::Message, ServiceError> {
		Ok(axum::extract::ws::Message::Text(serde_json::to_string(self)?))
	}
}
