use clap::Parser;

#[derive(Parser, Clone, Debug)]
pub struct Config {
    #[clap(env, long)]
    pub serpapi_key: String,

    #[clap(env, long, default_value_t = 3000)]
    pub port: u16,

    #[clap(env, long, default_value = "https://serpapi.com")]
    pub provider_base_url: String,

    #[clap(env, long, default_value_t = 4.0)]
    pub min_rating: f64,

    #[clap(env, long, default_value_t = 100)]
    pub min_reviews: u64,

    /// Upper bound on provider calls per search, first page included.
    #[clap(env, long, default_value_t = 10)]
    pub max_pages: usize,

    #[clap(env, long, default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Comma separated list, any origin is allowed when unset.
    #[clap(env, long)]
    pub origin_urls: Option<String>,
}
