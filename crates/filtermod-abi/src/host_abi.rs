//! Host symbol imports and the module-side capability adapters over them.
//!
//! The host process exports the `filtermod_callback_*` functions; the
//! dynamic loader resolves them when the module is opened. Everything else
//! in the SDK reaches them through the capability traits implemented here,
//! so tests substitute harness implementations and never touch a real host
//! symbol.

use std::any::Any;
use std::ffi::c_void;
use std::sync::Arc;

use filtermod_core::host::HostStream;
use filtermod_core::log::{Level, LogSink, Logger};

use crate::handle_abi::RouteConfigHandle;

mod imports {
    use std::ffi::c_void;

    unsafe extern "C" {
        pub fn filtermod_callback_log(level: u32, message_ptr: *const u8, message_len: usize);
        pub fn filtermod_callback_log_enabled(level: u32) -> bool;
        pub fn filtermod_callback_continue_request(stream: *mut c_void);
        pub fn filtermod_callback_continue_response(stream: *mut c_void);
        pub fn filtermod_callback_route_config(stream: *mut c_void) -> *const c_void;
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// [`LogSink`] over the host's exported log functions.
pub struct HostSink;

static HOST_SINK: HostSink = HostSink;

impl LogSink for HostSink {
    fn enabled(&self, level: Level) -> bool {
        // SAFETY: host export taking a primitive; callable any time after
        // the module is loaded.
        unsafe { imports::filtermod_callback_log_enabled(level as u32) }
    }

    fn write(&self, level: Level, message: &[u8]) {
        // SAFETY: pointer/length describe `message`, alive for this call.
        unsafe { imports::filtermod_callback_log(level as u32, message.as_ptr(), message.len()) }
    }
}

/// The process-wide logger over the host sink.
pub fn host_logger() -> Logger<'static> {
    Logger::new(&HOST_SINK)
}

// ---------------------------------------------------------------------------
// Per-stream capability
// ---------------------------------------------------------------------------

/// Typed wrapper for the host's per-stream back-reference.
///
/// The wrapped value is identity only; every operation forwards it back to a
/// host export. One value is built per boundary call and discarded when the
/// call returns, matching the borrowed lifetime of the underlying stream.
pub struct HostStreamRef {
    raw: *mut c_void,
}

impl HostStreamRef {
    /// Wrap the stream back-reference the host passed into the current
    /// boundary call.
    ///
    /// # Safety
    ///
    /// `raw` must be the host stream back-reference for a live stream, and
    /// the wrapper must not outlive the call it was built in.
    pub unsafe fn from_raw(raw: *mut c_void) -> Self {
        Self { raw }
    }

    /// The wrapped back-reference, for host accessor calls outside this
    /// core.
    pub fn as_raw(&self) -> *mut c_void {
        self.raw
    }

    /// An identity-only value for fixtures and tests. Capability calls on a
    /// detached ref would reach a host that is not there; fixtures must
    /// treat it as opaque.
    pub fn detached_for_tests() -> Self {
        Self {
            raw: std::ptr::null_mut(),
        }
    }
}

impl HostStream for HostStreamRef {
    fn continue_request(&mut self) {
        // SAFETY: raw is a live stream back-reference per from_raw contract.
        unsafe { imports::filtermod_callback_continue_request(self.raw) }
    }

    fn continue_response(&mut self) {
        // SAFETY: raw is a live stream back-reference per from_raw contract.
        unsafe { imports::filtermod_callback_continue_response(self.raw) }
    }

    fn route_config(&self) -> Option<Arc<dyn Any + Send + Sync>> {
        // SAFETY: raw is a live stream back-reference per from_raw contract.
        let ptr = unsafe { imports::filtermod_callback_route_config(self.raw) };
        if ptr.is_null() {
            None
        } else {
            // SAFETY: a non-null return is a route-config handle this module
            // produced, kept alive by the host's route table for this call.
            Some(unsafe { RouteConfigHandle::borrow_raw(ptr) }.payload())
        }
    }
}
