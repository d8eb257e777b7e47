use std::str::FromStr;

use crate::domain::feed::{pager::DEFAULT_PAGE_SIZE, pager::DEFAULT_PREFETCH_DISTANCE, PagerConfig};
use crate::services::response::ServiceError;

pub struct Config {
	/// Which errors we want to log
	pub log_level: String,

	/// Port server is listening to
	pub server_ip_port: String,
	/// In-memory store when unset
	pub database_url: Option<String>,
	pub allow_origins: String,
	pub pager: PagerConfig,
}

impl Config {
	pub fn new() -> Result<Config, ServiceError> {
		dotenv::dotenv().ok();
		Config::from_lookup(|key| std::env::var(key).ok())
	}

	pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ServiceError> {
		let log_level = lookup("LOG_LEVEL").unwrap_or("info".to_string());
		let server_ip_port = lookup("SERVER_IP_PORT").unwrap_or("0.0.0.0:80".into());
		let database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());
		let allow_origins = lookup("ALLOW_ORIGINS").unwrap_or("http://localhost:3000".to_string());
		let page_size = parse_or(&lookup, "FEED_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
		let prefetch_distance = parse_or(&lookup, "FEED_PREFETCH_DISTANCE", DEFAULT_PREFETCH_DISTANCE)?;
		if page_size == 0 {
			return Err(ServiceError::Config("FEED_PAGE_SIZE must be positive".into()));
		}

		Ok(Config {
			log_level,
			server_ip_port,
			database_url,
			allow_origins,
			pager: PagerConfig {
				page_size,
				prefetch_distance,
			},
		})
	}
}

fn parse_or<T: FromStr>(
	lookup: &impl Fn(&str) -> Option<String>,
	key: &str,
	default: T,
) -> Result<T, ServiceError> {
	match lookup(key) {
		None => Ok(default),
		Some(raw) => raw
			.trim()
			.parse()
			.map_err(|_| ServiceError::Config(format!("{key} is not a valid number: {raw}"))),
	}
}

#[cfg(test)]
mod test {
	use std::collections::HashMap;

	use super::Config;
	use crate::services::response::ServiceError;

	fn config(pairs: &[(&str, &str)]) -> Result<Config, ServiceError> {
		let env: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		Config::from_lookup(|key| env.get(key).cloned())
	}

	#[test]
	fn test_defaults() {
		let config = config(&[]).unwrap();
		assert_eq!(config.server_ip_port, "0.0.0.0:80");
		assert_eq!(config.database_url, None);
		assert_eq!(config.pager.page_size, 20);
		assert_eq!(config.pager.prefetch_distance, 3);
	}

	#[test]
	fn test_feed_overrides() {
		let config = config(&[("FEED_PAGE_SIZE", "50"), ("FEED_PREFETCH_DISTANCE", "5"), ("DATABASE_URL", "postgres://db")]).unwrap();
		assert_eq!(config.pager.page_size, 50);
		assert_eq!(config.pager.prefetch_distance, 5);
		assert_eq!(config.database_url.as_deref(), Some("postgres://db"));
	}

	#[test]
	fn test_invalid_page_size() {
		assert!(matches!(config(&[("FEED_PAGE_SIZE", "many")]), Err(ServiceError::Config(_))));
		assert!(matches!(config(&[("FEED_PAGE_SIZE", "0")]), Err(ServiceError::Config(_))));
	}
}
