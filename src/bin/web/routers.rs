use axum::{
	extract::{Path, State, WebSocketUpgrade},
	middleware,
	response::IntoResponse,
	routing::get,
	routing::post,
	Extension, Json, Router,
};

use timeline::{
	common::middleware_current_user::{set_current_user, CurrentUser},
	domain::{
		post::commands::{CreatePost, UpdateProfile},
		timeline::TimelineStateWrapper,
	},
	services::{
		handlers::TimelineHandler,
		posts::PostHandler,
		response::{ServiceError, ServiceResponse},
	},
};

async fn feed_websocket_route(
	ws: WebSocketUpgrade,
	State(state): State<TimelineStateWrapper>,
) -> impl IntoResponse {
	ws.on_upgrade(|socket| TimelineHandler::run_socket_broker(socket, state))
}

async fn create_post_route(
	State(state): State<TimelineStateWrapper>,
	Extension(CurrentUser(user_id)): Extension<CurrentUser>,
	Json(mut command): Json<CreatePost>,
) -> Result<ServiceResponse, ServiceError> {
	command.user_id = user_id;
	Ok(PostHandler::create_post(command, state).await?.into())
}

async fn post_card_route(
	State(state): State<TimelineStateWrapper>,
	Extension(CurrentUser(user_id)): Extension<CurrentUser>,
	Path(post_id): Path<i64>,
) -> Result<ServiceResponse, ServiceError> {
	Ok(PostHandler::post_card(post_id, &user_id, state).await?.into())
}

async fn like_state_route(
	State(state): State<TimelineStateWrapper>,
	Extension(CurrentUser(user_id)): Extension<CurrentUser>,
	Path(post_id): Path<i64>,
) -> Result<ServiceResponse, ServiceError> {
	Ok(PostHandler::like_state(post_id, &user_id, state).await?.into())
}

async fn toggle_like_route(
	State(state): State<TimelineStateWrapper>,
	Extension(CurrentUser(user_id)): Extension<CurrentUser>,
	Path(post_id): Path<i64>,
) -> Result<ServiceResponse, ServiceError> {
	Ok(PostHandler::toggle_like(post_id, &user_id, state).await?.into())
}

async fn get_profile_route(
	State(state): State<TimelineStateWrapper>,
	Path(user_id): Path<String>,
) -> Result<ServiceResponse, ServiceError> {
	Ok(PostHandler::get_profile(&user_id, state).await?.into())
}

async fn register_profile_route(
	State(state): State<TimelineStateWrapper>,
	Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<ServiceResponse, ServiceError> {
	Ok(PostHandler::register_profile(&user_id, state).await?.into())
}

async fn update_profile_route(
	State(state): State<TimelineStateWrapper>,
	Extension(CurrentUser(user_id)): Extension<CurrentUser>,
	Json(command): Json<UpdateProfile>,
) -> Result<ServiceResponse, ServiceError> {
	Ok(PostHandler::update_profile(&user_id, command, state).await?.into())
}

pub fn timeline_routers() -> Router<TimelineStateWrapper> {
	// Everything that acts as the caller needs `x-user-id`.
	let acting: Router<TimelineStateWrapper> = Router::new()
		.route("/posts", post(create_post_route))
		.route("/posts/:post_id/card", get(post_card_route))
		.route("/posts/:post_id/like", get(like_state_route).post(toggle_like_route))
		.route("/profiles", post(register_profile_route).put(update_profile_route))
		.route_layer(middleware::from_fn(set_current_user));

	Router::new()
		.route("/feed", get(feed_websocket_route))
		.route("/profiles/:user_id", get(get_profile_route))
		.merge(acting)
}
