use reqwest::Client;
use tracing::{debug, info, warn};
use crate::config::Config;
use crate::error::ProviderError;
use crate::models::restaurant::{GeoAnchor, RestaurantRecord};
use crate::models::serp_api::SearchResponse;

/// Fixed number of results the provider returns per page.
pub const PAGE_SIZE: usize = 20;

/// One provider page. `ok` is false when the call failed or the provider
/// reported an error, in which case `records` is empty.
#[derive(Debug, Default)]
pub struct PageResult {
    pub records: Vec<RestaurantRecord>,
    pub anchor: Option<GeoAnchor>,
    pub ok: bool,
}

impl PageResult {
    fn degraded() -> Self {
        Self::default()
    }

    fn is_exhausted(&self) -> bool {
        !self.ok || self.records.is_empty()
    }
}

pub struct SerpApiRepo {
    http_client: Client,
    base_url: String,
    api_key: String,
    max_pages: usize,
}

impl SerpApiRepo {
    pub fn new(http_client: Client, config: &Config) -> Self {
        Self {
            http_client,
            base_url: config.provider_base_url.trim_end_matches('/').to_string(),
            api_key: config.serpapi_key.clone(),
            max_pages: config.max_pages.max(1),
        }
    }

    /// Fetches one page of restaurants around `location`. Provider failures
    /// never escape: they are logged and degrade to an empty page.
    pub async fn fetch_page(
        &self,
        location: &str,
        anchor: Option<&GeoAnchor>,
        offset: usize,
    ) -> PageResult {
        match self.request_page(location, anchor, offset).await {
            Ok(records) => {
                debug!("Fetched {} records at offset {}", records.len(), offset);
                let anchor = records.first().and_then(GeoAnchor::from_record);
                PageResult {
                    records,
                    anchor,
                    ok: true,
                }
            }
            Err(e) => {
                warn!(
                    "Something went wrong fetching restaurants in {} at offset {} due to: {}",
                    location, offset, e
                );
                PageResult::degraded()
            }
        }
    }

    async fn request_page(
        &self,
        location: &str,
        anchor: Option<&GeoAnchor>,
        offset: usize,
    ) -> Result<Vec<RestaurantRecord>, ProviderError> {
        let search_query = format!("restaurants in {}", location);
        let mut params: Vec<(&str, String)> = vec![
            ("engine", "google_maps".to_string()),
            ("type", "search".to_string()),
            ("q", search_query),
            ("hl", "en".to_string()),
            ("api_key", self.api_key.clone()),
        ];
        if offset > 0 {
            params.push(("start", offset.to_string()));
        }
        if let Some(anchor) = anchor {
            params.push(("ll", anchor.as_ll_param()));
        }

        let response = self
            .http_client
            .get(format!("{}/search.json", self.base_url))
            .query(&params)
            .send()
            .await?;
        let status = response.status();
        let body = response.bytes().await?;

        // Provider errors arrive with a 4xx status and an `error` field, so
        // the body is inspected before the status.
        let parsed = serde_json::from_slice::<SearchResponse>(&body);
        match parsed {
            Ok(SearchResponse {
                error: Some(message),
                ..
            }) => Err(ProviderError::Reported { message }),
            Ok(_) | Err(_) if !status.is_success() => Err(ProviderError::HttpStatus {
                status: status.as_u16(),
            }),
            Ok(search) => Ok(search
                .local_results
                .into_iter()
                .map(RestaurantRecord::from)
                .collect()),
            Err(e) => Err(ProviderError::Decode(e)),
        }
    }

    /// Walks the provider's pages for `location` and concatenates them in
    /// arrival order. Later pages reuse the anchor taken from the first page,
    /// and nothing is fetched past the first page without one. Stops on the
    /// first failed or empty page, or after `max_pages` calls.
    pub async fn collect_all(&self, location: &str) -> Vec<RestaurantRecord> {
        let first = self.fetch_page(location, None, 0).await;
        let mut restaurants = first.records;

        let anchor = match first.anchor {
            Some(anchor) => anchor,
            None => {
                info!(
                    "No anchor in first page for {}, returning {} records",
                    location,
                    restaurants.len()
                );
                return restaurants;
            }
        };

        let mut pages_fetched = 1;
        for page_index in 1..self.max_pages {
            let page = self
                .fetch_page(location, Some(&anchor), page_index * PAGE_SIZE)
                .await;
            pages_fetched += 1;
            if page.is_exhausted() {
                break;
            }
            restaurants.extend(page.records);
        }

        info!(
            "Collected {} records for {} across {} pages",
            restaurants.len(),
            location,
            pages_fetched
        );
        restaurants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::{json, Value};
    use wiremock::matchers::{method, path, query_param, query_param_is_missing};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn repo_for(server: &MockServer, max_pages: usize) -> SerpApiRepo {
        let mut config = Config::parse_from(["restaurant-finder", "--serpapi-key", "test-key"]);
        config.provider_base_url = server.uri();
        config.max_pages = max_pages;
        SerpApiRepo::new(Client::new(), &config)
    }

    fn venue(title: &str, rating: f64, reviews: u64, with_gps: bool) -> Value {
        let mut venue = json!({"title": title, "rating": rating, "reviews": reviews});
        if with_gps {
            venue["gps_coordinates"] = json!({"latitude": 1.0, "longitude": 1.0});
        }
        venue
    }

    async fn mount_first_page(server: &MockServer, body: Value) {
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param_is_missing("start"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(server)
            .await;
    }

    async fn mount_page(server: &MockServer, start: &str, template: ResponseTemplate, calls: u64) {
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("start", start))
            .respond_with(template)
            .expect(calls)
            .mount(server)
            .await;
    }

    fn names(records: &[RestaurantRecord]) -> Vec<&str> {
        records.iter().filter_map(|r| r.name.as_deref()).collect()
    }

    #[tokio::test]
    async fn first_page_request_carries_query_without_offset_or_anchor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search.json"))
            .and(query_param("engine", "google_maps"))
            .and(query_param("q", "restaurants in Singapore"))
            .and(query_param("api_key", "test-key"))
            .and(query_param_is_missing("start"))
            .and(query_param_is_missing("ll"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "local_results": [venue("A", 4.5, 150, true)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let page = repo_for(&server, 5).fetch_page("Singapore", None, 0).await;

        assert!(page.ok);
        assert_eq!(names(&page.records), vec!["A"]);
        assert_eq!(page.anchor.unwrap().as_ll_param(), "@1,1,14z");
    }

    #[tokio::test]
    async fn later_pages_send_offset_and_anchor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("start", "20"))
            .and(query_param("ll", "@1,1,14z"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "local_results": [venue("B", 4.8, 200, false)]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let anchor = GeoAnchor::from_record(&RestaurantRecord {
            name: None,
            rating: None,
            review_count: None,
            address: None,
            phone: None,
            coordinates: Some(crate::models::restaurant::Coordinates {
                latitude: 1.0,
                longitude: 1.0,
            }),
            maps_link: None,
        });
        let page = repo_for(&server, 5)
            .fetch_page("Singapore", anchor.as_ref(), 20)
            .await;

        assert!(page.ok);
        assert_eq!(names(&page.records), vec!["B"]);
        assert!(page.anchor.is_none());
    }

    #[tokio::test]
    async fn provider_error_field_degrades_to_empty_page() {
        let server = MockServer::start().await;
        mount_first_page(&server, json!({"error": "Invalid API key."})).await;

        let page = repo_for(&server, 5).fetch_page("Singapore", None, 0).await;

        assert!(!page.ok);
        assert!(page.records.is_empty());
        assert!(page.anchor.is_none());
    }

    #[tokio::test]
    async fn error_status_and_malformed_body_degrade_to_empty_page() {
        let server = MockServer::start().await;
        mount_page(&server, "20", ResponseTemplate::new(502).set_body_string("bad gateway"), 1).await;
        mount_page(&server, "40", ResponseTemplate::new(200).set_body_string("{not json"), 1).await;

        let repo = repo_for(&server, 5);
        let failed_status = repo.fetch_page("Singapore", None, 20).await;
        let failed_decode = repo.fetch_page("Singapore", None, 40).await;

        assert!(!failed_status.ok);
        assert!(!failed_decode.ok);
    }

    #[tokio::test]
    async fn unreachable_provider_degrades_to_empty_page() {
        let mut config = Config::parse_from(["restaurant-finder", "--serpapi-key", "test-key"]);
        config.provider_base_url = "http://127.0.0.1:1".to_string();
        let repo = SerpApiRepo::new(Client::new(), &config);

        let page = repo.fetch_page("Singapore", None, 0).await;

        assert!(!page.ok);
        assert!(page.records.is_empty());
    }

    #[tokio::test]
    async fn slow_provider_times_out_into_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"local_results": [venue("A", 4.5, 150, true)]}))
                    .set_delay(std::time::Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let mut config = Config::parse_from(["restaurant-finder", "--serpapi-key", "test-key"]);
        config.provider_base_url = server.uri();
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(50))
            .build()
            .unwrap();
        let repo = SerpApiRepo::new(client, &config);

        let page = repo.fetch_page("Singapore", None, 0).await;

        assert!(!page.ok);
    }

    #[tokio::test]
    async fn collects_pages_in_order_until_provider_error() {
        let server = MockServer::start().await;
        mount_first_page(
            &server,
            json!({"local_results": [venue("A", 4.5, 150, true), venue("B", 3.0, 500, true)]}),
        )
        .await;
        mount_page(
            &server,
            "20",
            ResponseTemplate::new(200)
                .set_body_json(json!({"local_results": [venue("C", 4.8, 200, false)]})),
            1,
        )
        .await;
        mount_page(
            &server,
            "40",
            ResponseTemplate::new(400).set_body_json(json!({"error": "No more results"})),
            1,
        )
        .await;
        mount_page(&server, "60", ResponseTemplate::new(200), 0).await;

        let records = repo_for(&server, 10).collect_all("Singapore").await;

        assert_eq!(names(&records), vec!["A", "B", "C"]);
    }

    #[tokio::test]
    async fn stops_after_first_page_without_anchor() {
        let server = MockServer::start().await;
        mount_first_page(
            &server,
            json!({"local_results": [venue("A", 4.5, 150, false), venue("B", 4.1, 120, true)]}),
        )
        .await;
        mount_page(&server, "20", ResponseTemplate::new(200), 0).await;

        let records = repo_for(&server, 10).collect_all("Singapore").await;

        assert_eq!(names(&records), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn failed_first_page_yields_nothing() {
        let server = MockServer::start().await;
        mount_first_page(&server, json!({"error": "Invalid API key."})).await;
        mount_page(&server, "20", ResponseTemplate::new(200), 0).await;

        let records = repo_for(&server, 10).collect_all("Singapore").await;

        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn stops_on_empty_page() {
        let server = MockServer::start().await;
        mount_first_page(&server, json!({"local_results": [venue("A", 4.5, 150, true)]})).await;
        mount_page(
            &server,
            "20",
            ResponseTemplate::new(200).set_body_json(json!({"local_results": []})),
            1,
        )
        .await;
        mount_page(&server, "40", ResponseTemplate::new(200), 0).await;

        let records = repo_for(&server, 10).collect_all("Singapore").await;

        assert_eq!(names(&records), vec!["A"]);
    }

    #[tokio::test]
    async fn page_cap_bounds_a_provider_that_never_runs_out() {
        let server = MockServer::start().await;
        mount_first_page(&server, json!({"local_results": [venue("A", 4.5, 150, true)]})).await;
        for start in ["20", "40"] {
            mount_page(
                &server,
                start,
                ResponseTemplate::new(200)
                    .set_body_json(json!({"local_results": [venue(start, 4.5, 150, true)]})),
                1,
            )
            .await;
        }
        mount_page(&server, "60", ResponseTemplate::new(200), 0).await;

        let records = repo_for(&server, 3).collect_all("Singapore").await;

        assert_eq!(names(&records), vec!["A", "20", "40"]);
    }

    #[tokio::test]
    async fn duplicate_venues_across_pages_are_kept() {
        let server = MockServer::start().await;
        mount_first_page(&server, json!({"local_results": [venue("A", 4.5, 150, true)]})).await;
        mount_page(
            &server,
            "20",
            ResponseTemplate::new(200)
                .set_body_json(json!({"local_results": [venue("A", 4.5, 150, true)]})),
            1,
        )
        .await;
        mount_page(
            &server,
            "40",
            ResponseTemplate::new(200).set_body_json(json!({"local_results": []})),
            1,
        )
        .await;

        let records = repo_for(&server, 10).collect_all("Singapore").await;

        assert_eq!(names(&records), vec!["A", "A"]);
    }
}
