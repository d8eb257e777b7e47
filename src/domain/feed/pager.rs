use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::{adapters::repositories::PostRepository, domain::post::Post, services::response::ServiceError};

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_PREFETCH_DISTANCE: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PagerConfig {
	/// Posts requested per page.
	pub page_size: usize,
	/// How close to the end of `items` a visible row must be to trigger the next page.
	pub prefetch_distance: usize,
}

impl Default for PagerConfig {
	fn default() -> Self {
		Self {
			page_size: DEFAULT_PAGE_SIZE,
			prefetch_distance: DEFAULT_PREFETCH_DISTANCE,
		}
	}
}

/// A page fetch as it was issued. `generation` ties the result to the reload it belongs to.
/// `(before, before_id)` is the keyset of the oldest loaded post; `before_id` is empty
/// for the first page of a generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
	pub generation: u64,
	pub before: DateTime<Utc>,
	pub before_id: Option<i64>,
	pub limit: usize,
}

#[derive(Debug)]
pub struct PageOutcome {
	pub request: PageRequest,
	pub result: Result<Vec<Post>, ServiceError>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Applied {
	Appended(usize),
	Failed,
	/// Issued before the latest reload; nothing changed.
	Stale,
}

/// Receiving end of the fetch tasks a pager spawns. Kept apart from the pager so the
/// owner can await outcomes while still holding `&mut FeedPager` for other events.
pub struct PageOutcomes(mpsc::UnboundedReceiver<PageOutcome>);

impl PageOutcomes {
	pub async fn next(&mut self) -> Option<PageOutcome> {
		self.0.recv().await
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSnapshot {
	pub items: Vec<Post>,
	pub is_loading: bool,
	pub has_more_data: bool,
}

/// Cursor based pager over a [`PostRepository`].
///
/// All state lives behind `&mut self`; fetches run on spawned tasks and come back
/// through [`PageOutcomes`], to be handed to [`FeedPager::apply`] by the owner.
pub struct FeedPager<R: PostRepository + ?Sized> {
	repository: Arc<R>,
	config: PagerConfig,
	items: Vec<Post>,
	is_loading: bool,
	has_more_data: bool,
	generation: u64,
	last_error: Option<ServiceError>,
	outcome_sender: mpsc::UnboundedSender<PageOutcome>,
}

impl<R: PostRepository + ?Sized + 'static> FeedPager<R> {
	/// Builds the pager and issues the first page request.
	pub fn start(
		repository: Arc<R>,
		config: PagerConfig,
	) -> (Self, PageOutcomes) {
		let (outcome_sender, receiver) = mpsc::unbounded_channel();
		let mut pager = Self {
			repository,
			config,
			items: Vec::new(),
			is_loading: false,
			has_more_data: true,
			generation: 0,
			last_error: None,
			outcome_sender,
		};
		pager.load_next_page();
		(pager, PageOutcomes(receiver))
	}

	/// Drops everything loaded so far and fetches the newest page again.
	/// Pages still in flight from before the reload are discarded when they land.
	pub fn reload(&mut self) {
		self.generation += 1;
		self.items.clear();
		self.is_loading = false;
		self.has_more_data = true;
		self.last_error = None;
		tracing::debug!(generation = self.generation, "feed reloaded");
		self.load_next_page();
	}

	/// Called when row `index` becomes visible. Returns whether a page was requested.
	pub fn notify_visible(
		&mut self,
		index: usize,
	) -> bool {
		if self.is_loading || !self.has_more_data {
			return false;
		}
		if index + self.config.prefetch_distance >= self.items.len() {
			return self.load_next_page();
		}
		false
	}

	/// Issues the next page request unless one is in flight or the feed is exhausted.
	pub fn load_next_page(&mut self) -> bool {
		if self.is_loading || !self.has_more_data {
			return false;
		}
		self.is_loading = true;

		let (before, before_id) = self.cursor();
		let request = PageRequest {
			generation: self.generation,
			before,
			before_id,
			limit: self.config.page_size,
		};
		tracing::debug!(
			generation = request.generation,
			before = %request.before,
			before_id = ?request.before_id,
			limit = request.limit,
			"requesting feed page"
		);

		let repository = self.repository.clone();
		let sender = self.outcome_sender.clone();
		tokio::spawn(async move {
			let result = repository.fetch_posts(request.before, request.before_id, request.limit).await;
			// The pager may be gone by now; nobody is left to care.
			let _ = sender.send(PageOutcome { request, result });
		});
		true
	}

	/// Folds a finished fetch into the feed.
	pub fn apply(
		&mut self,
		outcome: PageOutcome,
	) -> Applied {
		let PageOutcome { request, result } = outcome;
		if request.generation != self.generation {
			tracing::debug!(
				stale = request.generation,
				current = self.generation,
				"discarding page from before reload"
			);
			return Applied::Stale;
		}
		self.is_loading = false;

		match result {
			Ok(posts) => {
				let returned = posts.len();
				self.items.extend(posts);
				self.has_more_data = returned == request.limit;
				self.last_error = None;
				Applied::Appended(returned)
			}
			Err(err) => {
				tracing::error!("Loading feed page before {} failed: {}", request.before, err);
				self.last_error = Some(err);
				Applied::Failed
			}
		}
	}

	pub fn items(&self) -> &[Post] {
		&self.items
	}

	pub fn is_loading(&self) -> bool {
		self.is_loading
	}

	pub fn has_more_data(&self) -> bool {
		self.has_more_data
	}

	pub fn last_error(&self) -> Option<&ServiceError> {
		self.last_error.as_ref()
	}

	pub fn generation(&self) -> u64 {
		self.generation
	}

	pub fn snapshot(&self) -> FeedSnapshot {
		FeedSnapshot {
			items: self.items.clone(),
			is_loading: self.is_loading,
			has_more_data: self.has_more_data,
		}
	}

	/// Keyset of the oldest loaded post, or now for an empty feed.
	fn cursor(&self) -> (DateTime<Utc>, Option<i64>) {
		self.items
			.iter()
			.rev()
			.find_map(|post| post.created_at.map(|created_at| (created_at, post.id)))
			.unwrap_or_else(|| (Utc::now(), None))
	}
}
