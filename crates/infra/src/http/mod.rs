//! HTTP client and calendar fetcher

pub mod client;
pub mod fetcher;

pub use client::{HttpClient, HttpClientBuilder};
pub use fetcher::HttpCalendarFetcher;
