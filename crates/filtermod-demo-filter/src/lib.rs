//! Sample filter module: a stream counter.
//!
//! Counts callback traffic per stream and logs a summary when the stream
//! completes. Demonstrates the full module surface: config payload parsing,
//! per-route overrides, the logging bridge, and the exported entry points.

use std::any::Any;
use std::sync::Arc;

use filtermod_abi::host_abi::HostSink;
use filtermod_abi::{HostStreamRef, host_logger};
use filtermod_core::config::{self, ConfigError};
use filtermod_core::filter::FilterConfig;
use filtermod_core::host::ConfigToken;

mod stream_counter;

use stream_counter::{CounterConfig, RouteOverrides};

/// Process-wide init. Nothing to set up; returning `true` accepts the load.
fn init() -> bool {
    true
}

/// Filter-config constructor for every chain that names this module.
fn new_config(
    _host: ConfigToken,
    name: &str,
    payload: &[u8],
) -> Result<Box<dyn FilterConfig<HostStreamRef>>, ConfigError> {
    match name {
        "stream_counter" => {
            let config = CounterConfig::<HostStreamRef>::from_payload(payload, Arc::new(HostSink))?;
            Ok(Box::new(config))
        }
        other => {
            host_logger().error(format_args!("stream_counter: unknown filter name {other:?}"));
            Err(ConfigError::UnknownFilter(other.to_owned()))
        }
    }
}

/// Per-route constructor: routes may override the summary label.
fn new_route_config(_name: &str, payload: &[u8]) -> Option<Arc<dyn Any + Send + Sync>> {
    match config::parse_json::<RouteOverrides>(payload) {
        Ok(overrides) => Some(Arc::new(overrides)),
        Err(err) => {
            host_logger().error(format_args!("stream_counter: bad route config: {err}"));
            None
        }
    }
}

// The entry points export #[no_mangle] symbols; keep them out of the unit
// test binary.
#[cfg(not(test))]
filtermod_abi::export_filter_module! {
    init = init,
    config = new_config,
    route_config = new_route_config,
}

// The host process exports the `filtermod_callback_*` symbols and the
// dynamic loader resolves them when the module `.so` is opened. The unit
// test binary links without a host, so provide the mock-host definitions
// here (test build only) to satisfy the boundary imports. The tests drive
// the filter against the harness mock host and never reach these.
#[cfg(test)]
mod test_host {
    use std::ffi::c_void;

    #[unsafe(no_mangle)]
    extern "C" fn filtermod_callback_log(_level: u32, _message_ptr: *const u8, _message_len: usize) {
    }

    #[unsafe(no_mangle)]
    extern "C" fn filtermod_callback_log_enabled(_level: u32) -> bool {
        false
    }

    #[unsafe(no_mangle)]
    extern "C" fn filtermod_callback_continue_request(_stream: *mut c_void) {}

    #[unsafe(no_mangle)]
    extern "C" fn filtermod_callback_continue_response(_stream: *mut c_void) {}

    #[unsafe(no_mangle)]
    extern "C" fn filtermod_callback_route_config(_stream: *mut c_void) -> *const c_void {
        std::ptr::null()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_accepts_the_load() {
        assert!(init());
    }

    #[test]
    fn config_constructor_accepts_the_module_name() {
        let config = new_config(ConfigToken::from_addr(0), "stream_counter", b"{}");
        assert!(config.is_ok());
    }

    #[test]
    fn route_constructor_parses_overrides() {
        let route = new_route_config("per_route", br#"{"label":"tenant-9"}"#).unwrap();
        let overrides = route.downcast_ref::<RouteOverrides>().unwrap();
        assert_eq!(overrides.label.as_deref(), Some("tenant-9"));
    }
}
