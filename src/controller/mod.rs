use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use crate::config::Config;
use crate::helpers::handler_404::page_not_found_handler;
use crate::helpers::html::PageRenderer;

pub mod health_check;
pub mod restaurant_controller;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub http_client: Client,
    pub renderer: Arc<PageRenderer>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Error building the provider HTTP client")?;
        let renderer = PageRenderer::new().context("Error loading page templates")?;

        Ok(Self {
            config: Arc::new(config),
            http_client,
            renderer: Arc::new(renderer),
        })
    }
}

pub async fn serve(app_state: AppState) -> anyhow::Result<()> {
    let allowed_origins = match &app_state.config.origin_urls {
        Some(origin_urls) => AllowOrigin::list(parse_origins(origin_urls)),
        None => AllowOrigin::from(Any),
    };

    let port = SocketAddr::from(([0, 0, 0, 0], app_state.config.port));
    let application = router_endpoints(app_state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_methods([Method::GET, Method::OPTIONS])
                        .allow_origin(allowed_origins)
                        .allow_headers([CONTENT_TYPE])
                )
        );

    info!("API server listening on port: {}", port);
    axum::Server::bind(&port)
        .serve(application.into_make_service())
        .await
        .context("Error spinning up the API server")
}

pub fn router_endpoints(app_state: AppState) -> Router {
    health_check::router()
        .merge(restaurant_controller::router(app_state))
        .fallback(page_not_found_handler)
}

fn parse_origins(origin_urls: &str) -> Vec<HeaderValue> {
    origin_urls
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid origin {} due to: {}", origin, e);
                None
            }
        })
        .collect()
}
