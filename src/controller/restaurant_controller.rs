use std::sync::Arc;
use anyhow::Context;
use axum::{Extension, Router};
use axum::extract::Query;
use axum::http::header::CONTENT_TYPE;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use crate::config::Config;
use crate::controller::AppState;
use crate::error::AppError;
use crate::helpers::html::{PageRenderer, NO_RESULTS_MESSAGE};
use crate::helpers::quality_filter::{filter_by_quality, QualityThresholds};
use crate::models::restaurant::RestaurantRecord;
use crate::repositories::serp_api_repo::SerpApiRepo;

pub fn router(app_state: AppState) -> Router {
    let serp_api_repo = Arc::new(SerpApiRepo::new(
        app_state.http_client.clone(),
        &app_state.config,
    ));

    Router::new()
        .route("/", get(search_form))
        .route("/restaurants", get(restaurants_page))
        .route("/api/restaurants", get(restaurants_json))
        .route_layer(Extension(serp_api_repo))
        .route_layer(Extension(app_state.config))
        .route_layer(Extension(app_state.renderer))
}

#[derive(Clone, Serialize, Deserialize, Debug, Default)]
pub struct RestaurantSearchParam {
    pub location: Option<String>,
    pub min_rating: Option<f64>,
    pub min_reviews: Option<u64>,
}

impl RestaurantSearchParam {
    fn location(&self) -> Result<&str, AppError> {
        self.location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .ok_or(AppError::MissingParameter { param: "location" })
    }

    fn thresholds(&self, config: &Config) -> Result<QualityThresholds, AppError> {
        let min_rating = match self.min_rating {
            Some(min_rating) if !min_rating.is_finite() => {
                return Err(AppError::InvalidParameter {
                    param: "min_rating",
                    reason: "must be a finite number",
                });
            }
            Some(min_rating) => min_rating,
            None => config.min_rating,
        };

        Ok(QualityThresholds {
            min_rating,
            min_reviews: self.min_reviews.unwrap_or(config.min_reviews),
        })
    }
}

pub async fn search_form(
    Extension(renderer): Extension<Arc<PageRenderer>>,
) -> Result<Html<String>, AppError> {
    let page = renderer
        .search_form_page()
        .context("Failed to render search form")?;
    Ok(Html(page))
}

pub async fn restaurants_page(
    Extension(serp_api_repo): Extension<Arc<SerpApiRepo>>,
    Extension(config): Extension<Arc<Config>>,
    Extension(renderer): Extension<Arc<PageRenderer>>,
    Query(query): Query<RestaurantSearchParam>,
) -> Result<Html<String>, AppError> {
    let location = query.location()?;
    let thresholds = query.thresholds(&config)?;
    let restaurants = find_restaurants(&serp_api_repo, location, &thresholds).await;

    let page = if restaurants.is_empty() {
        warn!("No top-rated restaurants found in {}", location);
        renderer.no_results_page()
    } else {
        renderer.results_page(location, &restaurants)
    };
    Ok(Html(page.context("Failed to render restaurants page")?))
}

pub async fn restaurants_json(
    Extension(serp_api_repo): Extension<Arc<SerpApiRepo>>,
    Extension(config): Extension<Arc<Config>>,
    Query(query): Query<RestaurantSearchParam>,
) -> Result<Response, AppError> {
    let location = query.location()?;
    let thresholds = query.thresholds(&config)?;
    let restaurants = find_restaurants(&serp_api_repo, location, &thresholds).await;

    let body = if restaurants.is_empty() {
        json!({ "message": NO_RESULTS_MESSAGE }).to_string()
    } else {
        serde_json::to_string(&restaurants).context("Failed to serialize restaurants")?
    };
    Ok((StatusCode::OK, [(CONTENT_TYPE, "application/json")], body).into_response())
}

async fn find_restaurants(
    serp_api_repo: &SerpApiRepo,
    location: &str,
    thresholds: &QualityThresholds,
) -> Vec<RestaurantRecord> {
    info!("Searching for restaurants in: {}", location);
    let candidates = serp_api_repo.collect_all(location).await;
    let candidate_count = candidates.len();
    let restaurants = filter_by_quality(candidates, thresholds);
    info!(
        "Found {} of {} restaurants in {} meeting the criteria",
        restaurants.len(),
        candidate_count,
        location
    );
    restaurants
}
