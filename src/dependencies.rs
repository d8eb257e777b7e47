use std::sync::{Arc, OnceLock};

use crate::{
	adapters::repositories::{MemoryRepository, Repositories, Repository},
	config::Config,
	database,
	services::response::ServiceError,
};

const MAX_CONNECTIONS: u32 = 30;

pub fn config() -> Result<&'static Config, ServiceError> {
	static CONFIG: OnceLock<Config> = OnceLock::new();
	let config = match CONFIG.get() {
		None => {
			let config = Config::new()?;

			CONFIG.get_or_init(|| config)
		}
		Some(config) => config,
	};
	Ok(config)
}

/// Postgres when `DATABASE_URL` is set, otherwise a process-local store.
pub async fn repositories(config: &Config) -> Result<Repositories, ServiceError> {
	match config.database_url.as_deref() {
		Some(url) => {
			let pool = database::connect(url, MAX_CONNECTIONS).await?;
			database::migrate(&pool).await?;
			Ok(Repositories::from_store(Arc::new(Repository::new(pool))))
		}
		None => {
			tracing::warn!("DATABASE_URL not set, posts live in memory only");
			Ok(Repositories::from_store(Arc::new(MemoryRepository::new())))
		}
	}
}

#[cfg(test)]
mod test {
	use super::repositories;
	use crate::{adapters::repositories::PostRepository, config::Config};

	#[tokio::test]
	async fn test_memory_store_without_database_url() {
		let config = Config::from_lookup(|_| None).unwrap();
		let repositories = repositories(&config).await.unwrap();
		assert!(repositories.posts.fetch_posts(chrono::Utc::now(), None, 20).await.unwrap().is_empty());
	}
}
