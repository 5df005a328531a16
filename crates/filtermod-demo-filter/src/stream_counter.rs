//! The stream-counter filter.
//!
//! Generic over the host stream so the same filter runs against the real
//! boundary wrapper in production and the harness mock host in tests.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::Deserialize;

use filtermod_core::config::{self, ConfigError};
use filtermod_core::filter::{FilterConfig, StreamFilter};
use filtermod_core::host::HostStream;
use filtermod_core::log::{LogSink, Logger};
use filtermod_core::status::{
    RequestBodyStatus, RequestHeadersStatus, RequestTrailersStatus, ResponseBodyStatus,
    ResponseHeadersStatus, ResponseTrailersStatus,
};

/// Settings parsed from the filter's JSON configuration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct CounterSettings {
    /// Label prefixed to every summary line.
    #[serde(default = "default_label")]
    pub label: String,
    /// Also log each body chunk at debug level.
    #[serde(default)]
    pub log_chunks: bool,
}

fn default_label() -> String {
    "stream_counter".to_owned()
}

/// Per-route overrides: a route may relabel the streams it carries.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RouteOverrides {
    #[serde(default)]
    pub label: Option<String>,
}

/// Configuration shared by every stream of one filter chain.
pub struct CounterConfig<H> {
    settings: Arc<CounterSettings>,
    sink: Arc<dyn LogSink + Send + Sync>,
    _host: PhantomData<fn(H) -> H>,
}

impl<H> std::fmt::Debug for CounterConfig<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CounterConfig")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl<H: HostStream + 'static> CounterConfig<H> {
    /// Parse the payload into owned settings. The payload is only borrowed
    /// for this call; everything kept is copied here.
    pub fn from_payload(
        payload: &[u8],
        sink: Arc<dyn LogSink + Send + Sync>,
    ) -> Result<Self, ConfigError> {
        let settings: CounterSettings = config::parse_json(payload)?;
        if settings.label.is_empty() {
            return Err(ConfigError::Rejected("label must not be empty".to_owned()));
        }
        Ok(Self {
            settings: Arc::new(settings),
            sink,
            _host: PhantomData,
        })
    }
}

impl<H: HostStream + 'static> FilterConfig<H> for CounterConfig<H> {
    fn new_stream_filter(&self, _host: &mut H) -> Option<Box<dyn StreamFilter<H>>> {
        Some(Box::new(CounterFilter {
            settings: Arc::clone(&self.settings),
            sink: Arc::clone(&self.sink),
            route_label: None,
            request_events: 0,
            response_events: 0,
            _host: PhantomData,
        }))
    }
}

/// Per-stream counter state.
struct CounterFilter<H> {
    settings: Arc<CounterSettings>,
    sink: Arc<dyn LogSink + Send + Sync>,
    route_label: Option<String>,
    request_events: u64,
    response_events: u64,
    _host: PhantomData<fn(H) -> H>,
}

impl<H: HostStream> CounterFilter<H> {
    fn logger(&self) -> Logger<'_> {
        Logger::new(self.sink.as_ref())
    }

    fn label(&self) -> &str {
        self.route_label.as_deref().unwrap_or(&self.settings.label)
    }
}

impl<H: HostStream + 'static> StreamFilter<H> for CounterFilter<H> {
    fn on_request_headers(&mut self, host: &mut H, _end_of_stream: bool) -> RequestHeadersStatus {
        // Route overrides are resolved once, at the first thing the host
        // delivers for the stream.
        if let Some(route) = host.route_config()
            && let Some(overrides) = route.downcast_ref::<RouteOverrides>()
            && let Some(label) = &overrides.label
        {
            self.route_label = Some(label.clone());
        }
        self.request_events += 1;
        RequestHeadersStatus::Continue
    }

    fn on_request_body(&mut self, _host: &mut H, end_of_stream: bool) -> RequestBodyStatus {
        self.request_events += 1;
        if self.settings.log_chunks {
            self.logger().debug(format_args!(
                "{}: request chunk (end_of_stream={end_of_stream})",
                self.label()
            ));
        }
        RequestBodyStatus::Continue
    }

    fn on_request_trailers(&mut self, _host: &mut H) -> RequestTrailersStatus {
        self.request_events += 1;
        RequestTrailersStatus::Continue
    }

    fn on_response_headers(&mut self, _host: &mut H, _end_of_stream: bool) -> ResponseHeadersStatus {
        self.response_events += 1;
        ResponseHeadersStatus::Continue
    }

    fn on_response_body(&mut self, _host: &mut H, end_of_stream: bool) -> ResponseBodyStatus {
        self.response_events += 1;
        if self.settings.log_chunks {
            self.logger().debug(format_args!(
                "{}: response chunk (end_of_stream={end_of_stream})",
                self.label()
            ));
        }
        ResponseBodyStatus::Continue
    }

    fn on_response_trailers(&mut self, _host: &mut H) -> ResponseTrailersStatus {
        self.response_events += 1;
        ResponseTrailersStatus::Continue
    }

    fn on_stream_complete(&mut self, _host: &mut H) {
        self.logger().info(format_args!(
            "{}: stream complete after {} request and {} response events",
            self.label(),
            self.request_events,
            self.response_events
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use filtermod_core::log::Level;
    use filtermod_harness::mock_stream::MockStream;
    use filtermod_harness::sink::RecordingSink;

    fn recording_config(
        payload: &[u8],
        floor: Level,
    ) -> (CounterConfig<MockStream>, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::at(floor));
        let config = CounterConfig::<MockStream>::from_payload(payload, sink.clone())
            .expect("payload should parse");
        (config, sink)
    }

    #[test]
    fn empty_label_is_rejected() {
        let sink = Arc::new(RecordingSink::at(Level::Trace));
        let err = CounterConfig::<MockStream>::from_payload(br#"{"label":""}"#, sink).unwrap_err();
        assert!(matches!(err, ConfigError::Rejected(_)));
    }

    #[test]
    fn summary_logged_on_stream_complete() {
        let (config, sink) = recording_config(br#"{"label":"edge"}"#, Level::Info);
        let mut host = MockStream::new();
        let mut filter = config.new_stream_filter(&mut host).unwrap();

        filter.on_request_headers(&mut host, false);
        filter.on_request_body(&mut host, true);
        filter.on_response_headers(&mut host, false);
        filter.on_response_body(&mut host, true);
        filter.on_stream_complete(&mut host);

        let rendered = sink.rendered();
        assert_eq!(rendered.len(), 1);
        assert_eq!(rendered[0].0, Level::Info);
        assert_eq!(
            rendered[0].1,
            "edge: stream complete after 2 request and 2 response events"
        );
    }

    #[test]
    fn chunk_logging_respects_the_sink_floor() {
        let (config, sink) = recording_config(br#"{"log_chunks":true}"#, Level::Warn);
        let mut host = MockStream::new();
        let mut filter = config.new_stream_filter(&mut host).unwrap();
        filter.on_request_body(&mut host, false);
        assert!(sink.is_empty(), "debug chunk line must be gated off");
    }

    #[test]
    fn route_override_relabels_the_summary() {
        let (config, sink) = recording_config(b"{}", Level::Info);
        let route: Arc<dyn std::any::Any + Send + Sync> = Arc::new(RouteOverrides {
            label: Some("tenant-42".to_owned()),
        });
        let mut host = MockStream::with_route_config(route);
        let mut filter = config.new_stream_filter(&mut host).unwrap();

        filter.on_request_headers(&mut host, true);
        filter.on_stream_complete(&mut host);

        let rendered = sink.rendered();
        assert!(rendered[0].1.starts_with("tenant-42:"), "{}", rendered[0].1);
    }

    #[test]
    fn default_settings_parse_from_empty_payload() {
        let (config, _sink) = recording_config(b"", Level::Info);
        let mut host = MockStream::new();
        assert!(config.new_stream_filter(&mut host).is_some());
    }
}
