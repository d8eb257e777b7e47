pub mod routers;

use std::{net::SocketAddr, str::FromStr};

use axum::{
	http::{HeaderValue, Method},
	Router,
};

use timeline::{
	dependencies::{config, repositories},
	domain::timeline::{TimelineState, TimelineStateWrapper},
};
use tower::ServiceBuilder;
use tower_http::{
	cors::{AllowOrigin, CorsLayer},
	trace::TraceLayer,
};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let config = config()?;

	// ! Tracing
	tracing_subscriber::registry()
		.with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
			// axum logs rejections from built-in extractors with the `axum::rejection`
			// target, at `TRACE` level. `axum::rejection=trace` enables showing those events
			format!("timeline={},web={},tower_http=debug,axum::rejection=trace", config.log_level, config.log_level).into()
		}))
		.with(tracing_subscriber::fmt::layer())
		.init();

	// ! Connection
	tracing::info!("Repositories are being prepared...");
	let state: TimelineStateWrapper = TimelineState::new(repositories(config).await?, config.pager).into();

	let origins = config
		.allow_origins
		.split(',')
		.map(|origin| origin.trim().parse::<HeaderValue>())
		.collect::<Result<Vec<_>, _>>()?;

	let app = Router::new()
		.nest("/timeline", routers::timeline_routers())
		.with_state(state)
		.layer(
			ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
				CorsLayer::new()
					.allow_origin(AllowOrigin::list(origins))
					.allow_methods([Method::GET, Method::POST, Method::PUT]),
			),
		);

	let address = SocketAddr::from_str(&config.server_ip_port)?;
	tracing::info!("Start Web Server on {}...", address);
	axum::Server::bind(&address).serve(app.into_make_service()).await?;
	Ok(())
}
