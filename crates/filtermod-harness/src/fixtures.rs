//! Counting filter fixture used by the scenario suite and boundary tests.
//!
//! The fixture is generic over the host stream type so the same code runs
//! against [`crate::mock_stream::MockStream`] in-process and against the
//! boundary layer's real stream wrapper in entry-point tests.

use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Deserialize;

use filtermod_core::config::{self, ConfigError};
use filtermod_core::filter::{FilterConfig, StreamFilter};
use filtermod_core::host::HostStream;
use filtermod_core::status::{
    RequestBodyStatus, RequestHeadersStatus, RequestTrailersStatus, ResponseBodyStatus,
    ResponseHeadersStatus, ResponseTrailersStatus,
};

use crate::ledger::{LeakLedger, LedgerToken};

/// Fixture settings, parsed from the JSON configuration payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CounterSettings {
    /// Decline every stream (exercises the null-filter path).
    #[serde(default)]
    pub decline_streams: bool,
    /// Fail stream construction after partial state exists (exercises the
    /// no-leak-on-failure path).
    #[serde(default)]
    pub fail_after_partial_setup: bool,
}

/// Per-stage invocation counters, shared between a config and the filters
/// it spawns.
#[derive(Debug, Default)]
pub struct StageCounters {
    pub request_headers: AtomicU64,
    pub request_body: AtomicU64,
    pub request_trailers: AtomicU64,
    pub response_headers: AtomicU64,
    pub response_body: AtomicU64,
    pub response_trailers: AtomicU64,
    pub stream_complete: AtomicU64,
}

impl StageCounters {
    pub fn total(&self) -> u64 {
        self.request_headers.load(Ordering::Relaxed)
            + self.request_body.load(Ordering::Relaxed)
            + self.request_trailers.load(Ordering::Relaxed)
            + self.response_headers.load(Ordering::Relaxed)
            + self.response_body.load(Ordering::Relaxed)
            + self.response_trailers.load(Ordering::Relaxed)
            + self.stream_complete.load(Ordering::Relaxed)
    }
}

/// Filter configuration that spawns counting filters.
pub struct CountingConfig<H> {
    settings: CounterSettings,
    counters: Arc<StageCounters>,
    ledger: Option<LeakLedger>,
    _token: Option<LedgerToken>,
    _host: PhantomData<fn(H) -> H>,
}

impl<H> std::fmt::Debug for CountingConfig<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CountingConfig").finish_non_exhaustive()
    }
}

impl<H: HostStream + 'static> CountingConfig<H> {
    pub fn new(settings: CounterSettings, ledger: Option<LeakLedger>) -> Self {
        let token = ledger.as_ref().map(|l| l.token("config"));
        Self {
            settings,
            counters: Arc::new(StageCounters::default()),
            ledger,
            _token: token,
            _host: PhantomData,
        }
    }

    /// Parse the payload and build the config, minting a ledger token when
    /// accounting is requested.
    pub fn from_payload(payload: &[u8], ledger: Option<LeakLedger>) -> Result<Self, ConfigError> {
        let settings: CounterSettings = config::parse_json(payload)?;
        Ok(Self::new(settings, ledger))
    }

    /// Shared counter handle for assertions after the config is boxed.
    pub fn counters(&self) -> Arc<StageCounters> {
        Arc::clone(&self.counters)
    }
}

impl<H: HostStream + 'static> FilterConfig<H> for CountingConfig<H> {
    fn new_stream_filter(&self, _host: &mut H) -> Option<Box<dyn StreamFilter<H>>> {
        if self.settings.decline_streams {
            return None;
        }
        let token = self.ledger.as_ref().map(|l| l.token("filter"));
        if self.settings.fail_after_partial_setup {
            // Simulated late failure: `token` is the partial state and is
            // dropped by scope before the null return.
            return None;
        }
        Some(Box::new(CountingFilter {
            counters: Arc::clone(&self.counters),
            _token: token,
            _host: PhantomData,
        }))
    }
}

/// Per-stream filter that counts callback invocations and always continues.
pub struct CountingFilter<H> {
    counters: Arc<StageCounters>,
    _token: Option<LedgerToken>,
    _host: PhantomData<fn(H) -> H>,
}

impl<H: HostStream + 'static> StreamFilter<H> for CountingFilter<H> {
    fn on_request_headers(&mut self, _host: &mut H, _end_of_stream: bool) -> RequestHeadersStatus {
        self.counters.request_headers.fetch_add(1, Ordering::Relaxed);
        RequestHeadersStatus::Continue
    }

    fn on_request_body(&mut self, _host: &mut H, _end_of_stream: bool) -> RequestBodyStatus {
        self.counters.request_body.fetch_add(1, Ordering::Relaxed);
        RequestBodyStatus::Continue
    }

    fn on_request_trailers(&mut self, _host: &mut H) -> RequestTrailersStatus {
        self.counters.request_trailers.fetch_add(1, Ordering::Relaxed);
        RequestTrailersStatus::Continue
    }

    fn on_response_headers(
        &mut self,
        _host: &mut H,
        _end_of_stream: bool,
    ) -> ResponseHeadersStatus {
        self.counters.response_headers.fetch_add(1, Ordering::Relaxed);
        ResponseHeadersStatus::Continue
    }

    fn on_response_body(&mut self, _host: &mut H, _end_of_stream: bool) -> ResponseBodyStatus {
        self.counters.response_body.fetch_add(1, Ordering::Relaxed);
        ResponseBodyStatus::Continue
    }

    fn on_response_trailers(&mut self, _host: &mut H) -> ResponseTrailersStatus {
        self.counters.response_trailers.fetch_add(1, Ordering::Relaxed);
        ResponseTrailersStatus::Continue
    }

    fn on_stream_complete(&mut self, _host: &mut H) {
        self.counters.stream_complete.fetch_add(1, Ordering::Relaxed);
    }
}
