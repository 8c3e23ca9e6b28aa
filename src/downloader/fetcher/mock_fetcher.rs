use std::cell::RefCell;

use super::{Fetcher, Response};

/// Replays a scripted queue of responses; an exhausted queue reads as a
/// connection failure.
pub struct MockFetcher {
    responses: RefCell<Vec<Response>>,
}

impl Fetcher for MockFetcher {
    fn fetch(&self, _url: &str) -> Response {
        let mut responses = self.responses.borrow_mut();

        if responses.is_empty() {
            Response::connection_failed()
        } else {
            responses.remove(0)
        }
    }
}

impl MockFetcher {
    pub fn new(responses: Vec<Response>) -> Self {
        Self {
            responses: RefCell::new(responses),
        }
    }
}
