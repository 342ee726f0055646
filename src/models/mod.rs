pub mod restaurant;
pub mod serp_api;
