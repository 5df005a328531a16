//! Recording implementation of the per-stream host capability.

use std::any::Any;
use std::sync::Arc;

use filtermod_core::host::HostStream;

/// A mock host stream. Records resumption calls and serves a configurable
/// per-route configuration.
#[derive(Default)]
pub struct MockStream {
    continue_request_calls: usize,
    continue_response_calls: usize,
    route: Option<Arc<dyn Any + Send + Sync>>,
}

impl MockStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stream whose route carries the given per-route configuration.
    pub fn with_route_config(route: Arc<dyn Any + Send + Sync>) -> Self {
        Self {
            route: Some(route),
            ..Self::default()
        }
    }

    pub fn continue_request_calls(&self) -> usize {
        self.continue_request_calls
    }

    pub fn continue_response_calls(&self) -> usize {
        self.continue_response_calls
    }
}

impl HostStream for MockStream {
    fn continue_request(&mut self) {
        self.continue_request_calls += 1;
    }

    fn continue_response(&mut self) {
        self.continue_response_calls += 1;
    }

    fn route_config(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        self.route.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_resumption_calls() {
        let mut stream = MockStream::new();
        stream.continue_request();
        stream.continue_request();
        stream.continue_response();
        assert_eq!(stream.continue_request_calls(), 2);
        assert_eq!(stream.continue_response_calls(), 1);
    }

    #[test]
    fn serves_route_config() {
        assert!(MockStream::new().route_config().is_none());
        let stream = MockStream::with_route_config(Arc::new("override"));
        let route = stream.route_config().unwrap();
        assert_eq!(route.downcast_ref::<&str>(), Some(&"override"));
    }
}
