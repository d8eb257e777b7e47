use axum::extract::ws::{Message, WebSocket};
use futures::{stream::SplitSink, SinkExt, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::{
	adapters::repositories::PostRepository,
	domain::{
		feed::{Applied, FeedPager, PageOutcome, PageOutcomes},
		post::events::PostCreated,
		timeline::{
			schemas::{ClientMessage, ServerMessage},
			TimelineStateWrapper,
		},
	},
};

use super::response::ServiceError;

pub enum SessionEvent {
	Page(PageOutcome),
	PostCreated,
}

/// One connected timeline: a pager of its own plus the post-created feed.
/// Every method runs on the task that owns the session.
pub struct TimelineSession {
	pub id: Uuid,
	pager: FeedPager<dyn PostRepository>,
	outcomes: PageOutcomes,
	post_created: broadcast::Receiver<PostCreated>,
	signals_open: bool,
}

impl TimelineSession {
	pub fn open(state: &TimelineStateWrapper) -> Self {
		let post_created = state.subscribe();
		let (pager, outcomes) = FeedPager::start(state.repositories.posts.clone(), state.pager);
		Self {
			id: Uuid::new_v4(),
			pager,
			outcomes,
			post_created,
			signals_open: true,
		}
	}

	pub fn pager(&self) -> &FeedPager<dyn PostRepository> {
		&self.pager
	}

	pub fn snapshot(&self) -> ServerMessage {
		self.pager.snapshot().into()
	}

	/// Waits for a fetch to land or a post to be created elsewhere.
	pub async fn next_event(&mut self) -> SessionEvent {
		loop {
			let created = tokio::select! {
				Some(outcome) = self.outcomes.next() => return SessionEvent::Page(outcome),
				created = self.post_created.recv(), if self.signals_open => created,
				else => std::future::pending::<Result<PostCreated, RecvError>>().await,
			};
			match created {
				// Missed signals collapse into one reload.
				Ok(_) | Err(RecvError::Lagged(_)) => return SessionEvent::PostCreated,
				Err(RecvError::Closed) => self.signals_open = false,
			}
		}
	}

	/// Returns the messages to push to the client, oldest first. Empty when nothing changed.
	pub fn handle_client_message(
		&mut self,
		message: ClientMessage,
	) -> Vec<ServerMessage> {
		match message {
			ClientMessage::Visible { index } => {
				if self.pager.notify_visible(index) {
					vec![self.snapshot()]
				} else {
					vec![]
				}
			}
			ClientMessage::Reload => {
				self.pager.reload();
				vec![self.snapshot()]
			}
		}
	}

	/// Interprets one websocket frame. `Err(UserCloseConnection)` ends the session;
	/// anything else unreadable is reported back to the client.
	pub fn handle_frame(
		&mut self,
		frame: Message,
	) -> Result<Vec<ServerMessage>, ServiceError> {
		match frame {
			// axum answers pings on its own.
			Message::Ping(_) | Message::Pong(_) => Ok(vec![]),
			frame => match ClientMessage::try_from(frame) {
				Ok(client_message) => Ok(self.handle_client_message(client_message)),
				Err(ServiceError::UserCloseConnection) => Err(ServiceError::UserCloseConnection),
				Err(err) => Ok(vec![ServerMessage::from(&err)]),
			},
		}
	}

	pub fn handle_event(
		&mut self,
		event: SessionEvent,
	) -> Vec<ServerMessage> {
		match event {
			SessionEvent::Page(outcome) => match self.pager.apply(outcome) {
				Applied::Stale => vec![],
				Applied::Appended(_) => vec![self.snapshot()],
				Applied::Failed => {
					let mut replies: Vec<ServerMessage> = self.pager.last_error().map(ServerMessage::from).into_iter().collect();
					replies.push(self.snapshot());
					replies
				}
			},
			SessionEvent::PostCreated => {
				tracing::debug!(session = %self.id, "post created elsewhere, reloading timeline");
				self.pager.reload();
				vec![self.snapshot()]
			}
		}
	}
}

enum Step {
	Incoming(Option<Result<Message, axum::Error>>),
	Event(SessionEvent),
}

pub struct TimelineHandler;
impl TimelineHandler {
	/// Drives a single websocket connection. The session is owned by this task,
	/// so every pager transition happens here.
	pub async fn run_socket_broker(
		stream: WebSocket,
		state: TimelineStateWrapper,
	) {
		let (mut sender, mut receiver) = stream.split();
		let mut session = TimelineSession::open(&state);
		tracing::info!(session = %session.id, "timeline session opened");

		if TimelineHandler::push(&mut sender, &session.snapshot()).await.is_err() {
			return;
		}

		'session: loop {
			let step = tokio::select! {
				incoming = receiver.next() => Step::Incoming(incoming),
				event = session.next_event() => Step::Event(event),
			};

			let replies = match step {
				Step::Incoming(Some(Ok(frame))) => match session.handle_frame(frame) {
					Ok(replies) => replies,
					Err(_) => break,
				},
				Step::Incoming(_) => break,
				Step::Event(event) => session.handle_event(event),
			};

			for reply in replies {
				if TimelineHandler::push(&mut sender, &reply).await.is_err() {
					break 'session;
				}
			}
		}
		tracing::info!(session = %session.id, "timeline session closed");
	}

	async fn push(
		sender: &mut SplitSink<WebSocket, Message>,
		message: &ServerMessage,
	) -> Result<(), ServiceError> {
		let frame = message.to_frame()?;
		sender.send(frame).await.map_err(|err| {
			tracing::debug!("Pushing to timeline failed: {:?}", err);
			ServiceError::UserCloseConnection
		})
	}
}

#[cfg(test)]
mod test {
	use std::sync::Arc;

	use axum::extract::ws::Message;
	use chrono::{Duration, Utc};

	use super::{SessionEvent, TimelineSession};
	use crate::{
		adapters::repositories::{MemoryRepository, PostRepository, Repositories},
		services::response::ServiceError,
		domain::{
			feed::PagerConfig,
			post::{commands::CreatePost, events::PostCreated, Post},
			timeline::{schemas::ClientMessage, schemas::ServerMessage, TimelineState, TimelineStateWrapper},
		},
	};

	fn state_with(count: i64) -> (TimelineStateWrapper, Arc<MemoryRepository>) {
		let now = Utc::now();
		let store = Arc::new(MemoryRepository::with_posts((0..count).map(|i| Post {
			user_id: Some("migo".into()),
			content: format!("post {i}"),
			created_at: Some(now - Duration::seconds(i + 1)),
			..Default::default()
		})));
		let state = TimelineState::new(Repositories::from_store(store.clone()), PagerConfig::default());
		(state.into(), store)
	}

	fn feed(mut replies: Vec<ServerMessage>) -> (usize, bool, bool) {
		match replies.pop() {
			Some(ServerMessage::Feed(snapshot)) => (snapshot.items.len(), snapshot.is_loading, snapshot.has_more_data),
			other => panic!("expected a feed snapshot, got {:?}", other),
		}
	}

	#[tokio::test]
	async fn test_session_scrolls_to_the_end() {
		'_given: {
			let (state, _store) = state_with(22);
			let mut session = TimelineSession::open(&state);
			assert_eq!(feed(vec![session.snapshot()]), (0, true, true));

			'_when: {
				let event = session.next_event().await;
				assert_eq!(feed(session.handle_event(event)), (20, false, true));

				assert!(session.handle_client_message(ClientMessage::Visible { index: 2 }).is_empty());
				assert_eq!(feed(session.handle_client_message(ClientMessage::Visible { index: 18 })), (20, true, true));

				let event = session.next_event().await;
				assert_eq!(feed(session.handle_event(event)), (22, false, false));
			}
		}
	}

	#[tokio::test]
	async fn test_session_reloads_when_a_post_is_created() {
		let (state, store) = state_with(3);
		let mut session = TimelineSession::open(&state);
		let event = session.next_event().await;
		session.handle_event(event);
		assert_eq!(session.pager().items().len(), 3);

		let post = store
			.add_post(CreatePost {
				user_id: "mago".into(),
				content: "fresh".into(),
				image_url: None,
			})
			.await
			.unwrap();
		state.publish(PostCreated::from(&post));

		let event = session.next_event().await;
		assert!(matches!(event, SessionEvent::PostCreated));
		assert_eq!(feed(session.handle_event(event)), (0, true, true));

		let event = session.next_event().await;
		assert_eq!(feed(session.handle_event(event)), (4, false, false));
		assert_eq!(session.pager().items()[0].content, "fresh");
	}

	#[tokio::test]
	async fn test_explicit_reload_discards_the_page_in_flight() {
		let (state, _store) = state_with(5);
		let mut session = TimelineSession::open(&state);
		assert_eq!(feed(session.handle_client_message(ClientMessage::Reload)), (0, true, true));

		let mut replies = Vec::new();
		for _ in 0..2 {
			let event = session.next_event().await;
			replies.push(session.handle_event(event));
		}
		assert_eq!(replies.iter().filter(|reply| reply.is_empty()).count(), 1);
		assert_eq!(session.pager().items().len(), 5);
	}

	#[tokio::test]
	async fn test_keepalive_frames_get_no_reply() {
		let (state, _store) = state_with(3);
		let mut session = TimelineSession::open(&state);

		assert_eq!(session.handle_frame(Message::Ping(vec![1, 2])), Ok(vec![]));
		assert_eq!(session.handle_frame(Message::Pong(vec![])), Ok(vec![]));

		let replies = session.handle_frame(Message::Binary(vec![1])).unwrap();
		assert!(matches!(replies.as_slice(), [ServerMessage::Error { .. }]));
		assert_eq!(session.handle_frame(Message::Close(None)), Err(ServiceError::UserCloseConnection));
	}
}
