mod ureq_fetcher;

use super::{Body, Fetcher, Response};

pub use ureq_fetcher::UreqFetcher;

#[cfg(test)]
mod mock_fetcher;

#[cfg(test)]
pub use mock_fetcher::MockFetcher;
