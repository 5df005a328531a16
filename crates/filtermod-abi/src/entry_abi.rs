//! Lifecycle entry points.
//!
//! Each `*_impl` function is the body of exactly one boundary entry point:
//! it reinterprets the opaque pointers as typed handles, forwards to one
//! capability operation, and translates the result back into the ABI's
//! null/status vocabulary. The [`export_filter_module!`] macro stamps the
//! `#[unsafe(no_mangle)]` wrappers into the module crate, binding the
//! module's constructor functions at compile time; no registration state
//! exists at run time.

use std::any::Any;
use std::ffi::{c_char, c_void};
use std::sync::Arc;

use filtermod_core::filter::{FilterConfig, NewFilterConfig, NewRouteConfig, StreamFilter};
use filtermod_core::host::ConfigToken;
use filtermod_core::status::{
    RequestBodyStatus, RequestHeadersStatus, RequestTrailersStatus, ResponseBodyStatus,
    ResponseHeadersStatus, ResponseTrailersStatus,
};

use crate::buffer_abi::{ByteView, RawBytes};
use crate::handle_abi::{ConfigHandle, FilterHandle, RouteConfigHandle};
use crate::host_abi::HostStreamRef;
use crate::version::abi_version_ptr;

// ---------------------------------------------------------------------------
// Module init
// ---------------------------------------------------------------------------

/// Run the module's init function; a `true` return hands the host the ABI
/// version string, `false` refuses to load.
pub fn module_init_impl(init: fn() -> bool) -> *const c_char {
    if init() {
        abi_version_ptr()
    } else {
        std::ptr::null()
    }
}

// ---------------------------------------------------------------------------
// Filter config
// ---------------------------------------------------------------------------

/// Build a filter configuration from the host's name and payload
/// descriptors. Returns an owned handle pointer, or null on a non-UTF-8
/// name or a constructor error. Nothing leaks on the failure paths: every
/// partial value is dropped by scope before null is returned.
///
/// # Safety
///
/// `name` and `payload` must describe memory valid for this call.
pub unsafe fn config_new_impl(
    host: *mut c_void,
    name: RawBytes,
    payload: RawBytes,
    new_config: NewFilterConfig<HostStreamRef>,
) -> *mut c_void {
    // SAFETY: descriptors are valid for the duration of this call.
    let (name, payload) = unsafe { (ByteView::from_raw(name), ByteView::from_raw(payload)) };
    let Ok(name) = std::str::from_utf8(name.as_slice()) else {
        return std::ptr::null_mut();
    };
    match new_config(ConfigToken::from_addr(host as usize), name, payload.as_slice()) {
        Ok(imp) => ConfigHandle::new(imp).into_raw(),
        // The constructor already had the chance to log its error.
        Err(_) => std::ptr::null_mut(),
    }
}

/// Destroy a filter configuration. Called by the host exactly once per
/// handle, after every filter instance spawned from it is destroyed.
///
/// # Safety
///
/// `config` must be a handle from [`config_new_impl`], not yet destroyed.
pub unsafe fn config_destroy_impl(config: *mut c_void) {
    // SAFETY: ownership returns here exactly once per handle.
    drop(unsafe { ConfigHandle::from_raw(config) });
}

// ---------------------------------------------------------------------------
// Per-stream filter
// ---------------------------------------------------------------------------

/// Spawn the per-stream filter for a new stream. Returns an owned handle
/// pointer, or null when the configuration declines.
///
/// # Safety
///
/// `config` must be a live config handle; `stream` must be the host stream
/// back-reference for this call.
pub unsafe fn filter_new_impl(config: *mut c_void, stream: *mut c_void) -> *mut c_void {
    // SAFETY: config is live for this call; stream is this call's
    // back-reference.
    let (config, mut host) = unsafe {
        (
            ConfigHandle::borrow_raw(config),
            HostStreamRef::from_raw(stream),
        )
    };
    match config.imp().new_stream_filter(&mut host) {
        Some(imp) => FilterHandle::new(imp).into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// # Safety
///
/// `filter` must be a live filter handle with no concurrent callback in
/// flight; `stream` must be this call's stream back-reference.
pub unsafe fn request_headers_impl(
    filter: *mut c_void,
    stream: *mut c_void,
    end_of_stream: bool,
) -> RequestHeadersStatus {
    // SAFETY: forwarded caller contract.
    let (filter, mut host) = unsafe {
        (
            FilterHandle::borrow_raw_mut(filter),
            HostStreamRef::from_raw(stream),
        )
    };
    filter.imp_mut().on_request_headers(&mut host, end_of_stream)
}

/// # Safety
///
/// Same contract as [`request_headers_impl`].
pub unsafe fn request_body_impl(
    filter: *mut c_void,
    stream: *mut c_void,
    end_of_stream: bool,
) -> RequestBodyStatus {
    // SAFETY: forwarded caller contract.
    let (filter, mut host) = unsafe {
        (
            FilterHandle::borrow_raw_mut(filter),
            HostStreamRef::from_raw(stream),
        )
    };
    filter.imp_mut().on_request_body(&mut host, end_of_stream)
}

/// # Safety
///
/// Same contract as [`request_headers_impl`].
pub unsafe fn request_trailers_impl(
    filter: *mut c_void,
    stream: *mut c_void,
) -> RequestTrailersStatus {
    // SAFETY: forwarded caller contract.
    let (filter, mut host) = unsafe {
        (
            FilterHandle::borrow_raw_mut(filter),
            HostStreamRef::from_raw(stream),
        )
    };
    filter.imp_mut().on_request_trailers(&mut host)
}

/// # Safety
///
/// Same contract as [`request_headers_impl`].
pub unsafe fn response_headers_impl(
    filter: *mut c_void,
    stream: *mut c_void,
    end_of_stream: bool,
) -> ResponseHeadersStatus {
    // SAFETY: forwarded caller contract.
    let (filter, mut host) = unsafe {
        (
            FilterHandle::borrow_raw_mut(filter),
            HostStreamRef::from_raw(stream),
        )
    };
    filter.imp_mut().on_response_headers(&mut host, end_of_stream)
}

/// # Safety
///
/// Same contract as [`request_headers_impl`].
pub unsafe fn response_body_impl(
    filter: *mut c_void,
    stream: *mut c_void,
    end_of_stream: bool,
) -> ResponseBodyStatus {
    // SAFETY: forwarded caller contract.
    let (filter, mut host) = unsafe {
        (
            FilterHandle::borrow_raw_mut(filter),
            HostStreamRef::from_raw(stream),
        )
    };
    filter.imp_mut().on_response_body(&mut host, end_of_stream)
}

/// # Safety
///
/// Same contract as [`request_headers_impl`].
pub unsafe fn response_trailers_impl(
    filter: *mut c_void,
    stream: *mut c_void,
) -> ResponseTrailersStatus {
    // SAFETY: forwarded caller contract.
    let (filter, mut host) = unsafe {
        (
            FilterHandle::borrow_raw_mut(filter),
            HostStreamRef::from_raw(stream),
        )
    };
    filter.imp_mut().on_response_trailers(&mut host)
}

/// # Safety
///
/// Same contract as [`request_headers_impl`].
pub unsafe fn stream_complete_impl(filter: *mut c_void, stream: *mut c_void) {
    // SAFETY: forwarded caller contract.
    let (filter, mut host) = unsafe {
        (
            FilterHandle::borrow_raw_mut(filter),
            HostStreamRef::from_raw(stream),
        )
    };
    filter.imp_mut().on_stream_complete(&mut host);
}

/// Destroy a filter instance at stream teardown.
///
/// # Safety
///
/// `filter` must be a handle from [`filter_new_impl`], not yet destroyed.
pub unsafe fn filter_destroy_impl(filter: *mut c_void) {
    // SAFETY: ownership returns here exactly once per handle.
    drop(unsafe { FilterHandle::from_raw(filter) });
}

// ---------------------------------------------------------------------------
// Per-route config
// ---------------------------------------------------------------------------

/// Build a per-route configuration from the host's route table. Returns an
/// owned handle pointer or null.
///
/// # Safety
///
/// `name` and `payload` must describe memory valid for this call.
pub unsafe fn route_config_new_impl(
    name: RawBytes,
    payload: RawBytes,
    new_route: NewRouteConfig,
) -> *mut c_void {
    // SAFETY: descriptors are valid for the duration of this call.
    let (name, payload) = unsafe { (ByteView::from_raw(name), ByteView::from_raw(payload)) };
    let Ok(name) = std::str::from_utf8(name.as_slice()) else {
        return std::ptr::null_mut();
    };
    match new_route(name, payload.as_slice()) {
        Some(imp) => RouteConfigHandle::new(imp).into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// Destroy a per-route configuration.
///
/// # Safety
///
/// `route` must be a handle from [`route_config_new_impl`], not yet
/// destroyed.
pub unsafe fn route_config_destroy_impl(route: *mut c_void) {
    // SAFETY: ownership returns here exactly once per handle.
    drop(unsafe { RouteConfigHandle::from_raw(route) });
}

/// Default per-route constructor for modules without route-scoped data.
pub fn no_route_config(_name: &str, _payload: &[u8]) -> Option<Arc<dyn Any + Send + Sync>> {
    None
}

// ---------------------------------------------------------------------------
// Export macro
// ---------------------------------------------------------------------------

/// Generate the boundary entry points for a filter module.
///
/// `init` is the module's process-init function (`fn() -> bool`), `config`
/// its filter-config constructor
/// ([`filtermod_core::filter::NewFilterConfig`]), and the optional
/// `route_config` its per-route constructor
/// ([`filtermod_core::filter::NewRouteConfig`]). The functions are bound
/// into the generated symbols at compile time.
///
/// ```ignore
/// filtermod_abi::export_filter_module! {
///     init = my_init,
///     config = my_new_config,
///     route_config = my_new_route_config,
/// }
/// ```
///
/// Invoke it once per module crate, gated with `#[cfg(not(test))]` so the
/// crate's own test binary does not export boundary symbols.
#[macro_export]
macro_rules! export_filter_module {
    (init = $init:expr, config = $config:expr $(,)?) => {
        $crate::export_filter_module! {
            init = $init,
            config = $config,
            route_config = $crate::entry_abi::no_route_config,
        }
    };
    (init = $init:expr, config = $config:expr, route_config = $route:expr $(,)?) => {
        #[unsafe(no_mangle)]
        pub extern "C" fn filtermod_on_module_init() -> *const ::std::os::raw::c_char {
            $crate::entry_abi::module_init_impl($init)
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_config_new(
            host: *mut ::std::os::raw::c_void,
            name: $crate::RawBytes,
            payload: $crate::RawBytes,
        ) -> *mut ::std::os::raw::c_void {
            unsafe { $crate::entry_abi::config_new_impl(host, name, payload, $config) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_config_destroy(
            config: *mut ::std::os::raw::c_void,
        ) {
            unsafe { $crate::entry_abi::config_destroy_impl(config) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_filter_new(
            config: *mut ::std::os::raw::c_void,
            stream: *mut ::std::os::raw::c_void,
        ) -> *mut ::std::os::raw::c_void {
            unsafe { $crate::entry_abi::filter_new_impl(config, stream) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_filter_request_headers(
            filter: *mut ::std::os::raw::c_void,
            stream: *mut ::std::os::raw::c_void,
            end_of_stream: bool,
        ) -> $crate::status::RequestHeadersStatus {
            unsafe { $crate::entry_abi::request_headers_impl(filter, stream, end_of_stream) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_filter_request_body(
            filter: *mut ::std::os::raw::c_void,
            stream: *mut ::std::os::raw::c_void,
            end_of_stream: bool,
        ) -> $crate::status::RequestBodyStatus {
            unsafe { $crate::entry_abi::request_body_impl(filter, stream, end_of_stream) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_filter_request_trailers(
            filter: *mut ::std::os::raw::c_void,
            stream: *mut ::std::os::raw::c_void,
        ) -> $crate::status::RequestTrailersStatus {
            unsafe { $crate::entry_abi::request_trailers_impl(filter, stream) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_filter_response_headers(
            filter: *mut ::std::os::raw::c_void,
            stream: *mut ::std::os::raw::c_void,
            end_of_stream: bool,
        ) -> $crate::status::ResponseHeadersStatus {
            unsafe { $crate::entry_abi::response_headers_impl(filter, stream, end_of_stream) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_filter_response_body(
            filter: *mut ::std::os::raw::c_void,
            stream: *mut ::std::os::raw::c_void,
            end_of_stream: bool,
        ) -> $crate::status::ResponseBodyStatus {
            unsafe { $crate::entry_abi::response_body_impl(filter, stream, end_of_stream) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_filter_response_trailers(
            filter: *mut ::std::os::raw::c_void,
            stream: *mut ::std::os::raw::c_void,
        ) -> $crate::status::ResponseTrailersStatus {
            unsafe { $crate::entry_abi::response_trailers_impl(filter, stream) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_filter_stream_complete(
            filter: *mut ::std::os::raw::c_void,
            stream: *mut ::std::os::raw::c_void,
        ) {
            unsafe { $crate::entry_abi::stream_complete_impl(filter, stream) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_filter_destroy(
            filter: *mut ::std::os::raw::c_void,
        ) {
            unsafe { $crate::entry_abi::filter_destroy_impl(filter) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_route_config_new(
            name: $crate::RawBytes,
            payload: $crate::RawBytes,
        ) -> *mut ::std::os::raw::c_void {
            unsafe { $crate::entry_abi::route_config_new_impl(name, payload, $route) }
        }

        #[unsafe(no_mangle)]
        pub unsafe extern "C" fn filtermod_on_route_config_destroy(
            route: *mut ::std::os::raw::c_void,
        ) {
            unsafe { $crate::entry_abi::route_config_destroy_impl(route) }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use filtermod_core::config::ConfigError;
    use filtermod_core::filter::{FilterConfig, StreamFilter};

    struct NopConfig;

    impl FilterConfig<HostStreamRef> for NopConfig {
        fn new_stream_filter(
            &self,
            _host: &mut HostStreamRef,
        ) -> Option<Box<dyn StreamFilter<HostStreamRef>>> {
            Some(Box::new(NopFilter))
        }
    }

    struct NopFilter;

    impl StreamFilter<HostStreamRef> for NopFilter {}

    fn nop_new_config(
        _host: ConfigToken,
        name: &str,
        _payload: &[u8],
    ) -> Result<Box<dyn FilterConfig<HostStreamRef>>, ConfigError> {
        if name == "reject" {
            return Err(ConfigError::UnknownFilter(name.to_owned()));
        }
        Ok(Box::new(NopConfig))
    }

    #[test]
    fn init_returns_version_on_success_and_null_on_failure() {
        assert_eq!(
            module_init_impl(|| true) as *const u8,
            crate::ABI_VERSION.as_ptr()
        );
        assert!(module_init_impl(|| false).is_null());
    }

    #[test]
    fn config_new_rejects_non_utf8_name() {
        let bad = [0xFFu8, 0xFE];
        // SAFETY: descriptors reference live locals for this call.
        let handle = unsafe {
            config_new_impl(
                std::ptr::null_mut(),
                RawBytes::from_slice(&bad),
                RawBytes::EMPTY,
                nop_new_config,
            )
        };
        assert!(handle.is_null());
    }

    #[test]
    fn config_new_maps_constructor_error_to_null() {
        // SAFETY: descriptors reference live byte literals for this call.
        let handle = unsafe {
            config_new_impl(
                std::ptr::null_mut(),
                RawBytes::from_slice(b"reject"),
                RawBytes::EMPTY,
                nop_new_config,
            )
        };
        assert!(handle.is_null());
    }

    #[test]
    fn config_and_filter_round_trip_through_raw_handles() {
        // SAFETY: descriptors reference live byte literals for this call.
        let config = unsafe {
            config_new_impl(
                std::ptr::null_mut(),
                RawBytes::from_slice(b"nop"),
                RawBytes::from_slice(b"{}"),
                nop_new_config,
            )
        };
        assert!(!config.is_null());

        // SAFETY: config is live; a null stream is identity-only for a
        // filter that never calls host capabilities.
        let filter = unsafe { filter_new_impl(config, std::ptr::null_mut()) };
        assert!(!filter.is_null());

        // SAFETY: filter handle is live and callbacks are serialized here.
        unsafe {
            assert_eq!(
                request_headers_impl(filter, std::ptr::null_mut(), false),
                RequestHeadersStatus::Continue
            );
            stream_complete_impl(filter, std::ptr::null_mut());
            filter_destroy_impl(filter);
            config_destroy_impl(config);
        }
    }

    #[test]
    fn default_route_constructor_declines() {
        // SAFETY: descriptors reference live byte literals for this call.
        let route = unsafe {
            route_config_new_impl(
                RawBytes::from_slice(b"anything"),
                RawBytes::EMPTY,
                no_route_config,
            )
        };
        assert!(route.is_null());
    }

    #[test]
    fn route_config_round_trip() {
        fn new_route(_name: &str, payload: &[u8]) -> Option<Arc<dyn Any + Send + Sync>> {
            Some(Arc::new(payload.len()))
        }
        // SAFETY: descriptors reference live byte literals for this call.
        let route = unsafe {
            route_config_new_impl(
                RawBytes::from_slice(b"shadow"),
                RawBytes::from_slice(b"xyz"),
                new_route,
            )
        };
        assert!(!route.is_null());
        // SAFETY: route is the live handle created above; borrow ends
        // before destroy.
        let payload = unsafe { RouteConfigHandle::borrow_raw(route) }.payload();
        assert_eq!(payload.downcast_ref::<usize>(), Some(&3));
        // SAFETY: destroyed exactly once.
        unsafe { route_config_destroy_impl(route) };
    }
}
