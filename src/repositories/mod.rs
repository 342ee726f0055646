pub mod serp_api_repo;
