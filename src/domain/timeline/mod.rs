pub mod schemas;
use std::{ops::Deref, sync::Arc};

use tokio::sync::broadcast;

use crate::{adapters::repositories::Repositories, domain::feed::PagerConfig, domain::post::events::PostCreated};

const POST_CREATED_CAPACITY: usize = 100;

// shared by every timeline session and the post endpoints
pub struct TimelineState {
	pub repositories: Repositories,
	pub pager: PagerConfig,
	pub post_created: broadcast::Sender<PostCreated>,
}

impl TimelineState {
	pub fn new(
		repositories: Repositories,
		pager: PagerConfig,
	) -> Self {
		let (post_created, _rx) = broadcast::channel(POST_CREATED_CAPACITY);
		Self {
			repositories,
			pager,
			post_created,
		}
	}

	pub fn subscribe(&self) -> broadcast::Receiver<PostCreated> {
		self.post_created.subscribe()
	}

	/// Tells open timelines a post landed. Having no listeners is fine.
	pub fn publish(
		&self,
		event: PostCreated,
	) {
		if let Err(err) = self.post_created.send(event) {
			tracing::debug!("No timeline is listening for {:?}", err.0);
		}
	}
}

#[derive(Clone)]
pub struct TimelineStateWrapper(pub Arc<TimelineState>);
impl From<Arc<TimelineState>> for TimelineStateWrapper {
	fn from(value: Arc<TimelineState>) -> Self {
		Self(value)
	}
}
impl From<TimelineState> for TimelineStateWrapper {
	fn from(value: TimelineState) -> Self {
		Arc::new(value).into()
	}
}
impl Deref for TimelineStateWrapper {
	type Target = TimelineState;
	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
