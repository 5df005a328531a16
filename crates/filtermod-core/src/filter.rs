//! Filter capability traits.
//!
//! A module supplies one [`FilterConfig`] implementation per configured
//! filter chain and one [`StreamFilter`] implementation per live stream.
//! Both are destroyed by dropping: the boundary layer turns the host's
//! destroy calls into exactly one drop of the owning handle, so `Drop` is
//! the place to release whatever a config or filter holds.

use std::any::Any;
use std::sync::Arc;

use crate::config::ConfigError;
use crate::host::{ConfigToken, HostStream};
use crate::status::{
    RequestBodyStatus, RequestHeadersStatus, RequestTrailersStatus, ResponseBodyStatus,
    ResponseHeadersStatus, ResponseTrailersStatus,
};

/// Per-filter-chain configuration capability.
///
/// `Send + Sync` is a contract, not a convenience: the host spawns stream
/// filters from multiple worker threads against the same configuration, so
/// implementations must be immutable after construction or synchronize
/// internally.
pub trait FilterConfig<H: HostStream>: Send + Sync {
    /// Construct the per-stream filter state for a new stream.
    ///
    /// `None` tells the host the filter cannot attach to this stream; the
    /// resulting stream-level behavior is host policy. Implementations must
    /// release any partially built state before returning `None`.
    fn new_stream_filter(&self, host: &mut H) -> Option<Box<dyn StreamFilter<H>>>;
}

/// Per-stream filter capability.
///
/// The host serializes all callbacks for one instance, so implementations
/// need no internal synchronization. Callbacks arrive in any order
/// consistent with headers-before-body-before-trailers per direction;
/// neither direction is guaranteed to occur at all. Borrowed views passed
/// through the host accessor surface must never be retained across a
/// callback return.
///
/// Every callback defaults to its stage's `Continue`, so a filter only
/// overrides the stages it cares about.
pub trait StreamFilter<H: HostStream> {
    /// Request headers arrived. `end_of_stream` means no request body or
    /// trailers will follow.
    fn on_request_headers(&mut self, _host: &mut H, _end_of_stream: bool) -> RequestHeadersStatus {
        RequestHeadersStatus::Continue
    }

    /// A request body chunk arrived.
    fn on_request_body(&mut self, _host: &mut H, _end_of_stream: bool) -> RequestBodyStatus {
        RequestBodyStatus::Continue
    }

    /// Request trailers arrived; the request direction is complete.
    fn on_request_trailers(&mut self, _host: &mut H) -> RequestTrailersStatus {
        RequestTrailersStatus::Continue
    }

    /// Response headers arrived. `end_of_stream` means no response body or
    /// trailers will follow.
    fn on_response_headers(
        &mut self,
        _host: &mut H,
        _end_of_stream: bool,
    ) -> ResponseHeadersStatus {
        ResponseHeadersStatus::Continue
    }

    /// A response body chunk arrived.
    fn on_response_body(&mut self, _host: &mut H, _end_of_stream: bool) -> ResponseBodyStatus {
        ResponseBodyStatus::Continue
    }

    /// Response trailers arrived; the response direction is complete.
    fn on_response_trailers(&mut self, _host: &mut H) -> ResponseTrailersStatus {
        ResponseTrailersStatus::Continue
    }

    /// The stream finished. Called at most once, after the last stage
    /// callback and before the instance is destroyed.
    fn on_stream_complete(&mut self, _host: &mut H) {}
}

/// Constructor signature the module supplies for filter configurations.
///
/// `name` and `payload` are borrowed for the duration of the call; anything
/// the configuration keeps must be copied into owned storage (parsing the
/// payload into an owned settings struct does this naturally). Returning
/// `Err` surfaces as a null handle to the host.
pub type NewFilterConfig<H> =
    fn(host: ConfigToken, name: &str, payload: &[u8]) -> Result<Box<dyn FilterConfig<H>>, ConfigError>;

/// Constructor signature the module supplies for per-route configurations.
///
/// Invoked by the host's route table; the returned value is later visible to
/// stream filters through [`HostStream::route_config`]. `None` rejects the
/// per-route configuration.
pub type NewRouteConfig = fn(name: &str, payload: &[u8]) -> Option<Arc<dyn Any + Send + Sync>>;

#[cfg(test)]
mod tests {
    use super::*;

    struct NopStream;

    impl HostStream for NopStream {
        fn continue_request(&mut self) {}
        fn continue_response(&mut self) {}
        fn route_config(&self) -> Option<Arc<dyn Any + Send + Sync>> {
            None
        }
    }

    struct DefaultFilter;

    impl StreamFilter<NopStream> for DefaultFilter {}

    #[test]
    fn every_default_callback_continues() {
        let mut filter = DefaultFilter;
        let mut host = NopStream;
        for eos in [false, true] {
            assert_eq!(
                filter.on_request_headers(&mut host, eos),
                RequestHeadersStatus::Continue
            );
            assert_eq!(
                filter.on_request_body(&mut host, eos),
                RequestBodyStatus::Continue
            );
            assert_eq!(
                filter.on_response_headers(&mut host, eos),
                ResponseHeadersStatus::Continue
            );
            assert_eq!(
                filter.on_response_body(&mut host, eos),
                ResponseBodyStatus::Continue
            );
        }
        assert_eq!(
            filter.on_request_trailers(&mut host),
            RequestTrailersStatus::Continue
        );
        assert_eq!(
            filter.on_response_trailers(&mut host),
            ResponseTrailersStatus::Continue
        );
        filter.on_stream_complete(&mut host);
    }
}
