//! Owned handles that cross the boundary as opaque pointers.
//!
//! The host never sees a trait object: each capability is wrapped in a named
//! handle struct so the raw pointer handed across the boundary is always
//! thin. `into_raw` transfers ownership to the host's bookkeeping;
//! `from_raw` takes it back exactly once on the destroy path, and
//! `borrow_raw`/`borrow_raw_mut` lend access for the duration of a single
//! callback. The exactly-once pairing is the host's contract; these types do
//! not defend against a second destroy.

use std::any::Any;
use std::ffi::c_void;
use std::sync::Arc;

use filtermod_core::filter::{FilterConfig, StreamFilter};

use crate::host_abi::HostStreamRef;

/// Owning handle for one filter configuration.
pub struct ConfigHandle {
    imp: Box<dyn FilterConfig<HostStreamRef>>,
}

impl ConfigHandle {
    pub fn new(imp: Box<dyn FilterConfig<HostStreamRef>>) -> Box<Self> {
        Box::new(Self { imp })
    }

    /// Transfer ownership to the host as an opaque pointer.
    pub fn into_raw(self: Box<Self>) -> *mut c_void {
        Box::into_raw(self) as *mut c_void
    }

    /// Reclaim ownership from the host. Dropping the result releases the
    /// configuration.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`ConfigHandle::into_raw`] and must not be used
    /// again afterwards.
    pub unsafe fn from_raw(ptr: *mut c_void) -> Box<Self> {
        // SAFETY: ptr originates from Box::into_raw on this type.
        unsafe { Box::from_raw(ptr as *mut Self) }
    }

    /// Borrow the handle behind a host-held pointer for one call.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`ConfigHandle::into_raw`], not yet destroyed,
    /// and the borrow must end before the call returns.
    pub unsafe fn borrow_raw<'a>(ptr: *mut c_void) -> &'a Self {
        // SAFETY: ptr is a live Box<Self> owned by the host's bookkeeping.
        unsafe { &*(ptr as *const Self) }
    }

    pub fn imp(&self) -> &dyn FilterConfig<HostStreamRef> {
        self.imp.as_ref()
    }
}

/// Owning handle for one per-stream filter instance.
pub struct FilterHandle {
    imp: Box<dyn StreamFilter<HostStreamRef>>,
}

impl FilterHandle {
    pub fn new(imp: Box<dyn StreamFilter<HostStreamRef>>) -> Box<Self> {
        Box::new(Self { imp })
    }

    /// Transfer ownership to the host as an opaque pointer.
    pub fn into_raw(self: Box<Self>) -> *mut c_void {
        Box::into_raw(self) as *mut c_void
    }

    /// Reclaim ownership from the host on stream teardown.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`FilterHandle::into_raw`] and must not be used
    /// again afterwards.
    pub unsafe fn from_raw(ptr: *mut c_void) -> Box<Self> {
        // SAFETY: ptr originates from Box::into_raw on this type.
        unsafe { Box::from_raw(ptr as *mut Self) }
    }

    /// Borrow the instance behind a host-held pointer for one callback.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`FilterHandle::into_raw`], not yet destroyed,
    /// and the host must serialize callbacks on it (no aliasing borrows).
    pub unsafe fn borrow_raw_mut<'a>(ptr: *mut c_void) -> &'a mut Self {
        // SAFETY: ptr is a live Box<Self>; the host serializes callbacks per
        // instance, so the mutable borrow is exclusive.
        unsafe { &mut *(ptr as *mut Self) }
    }

    pub fn imp_mut(&mut self) -> &mut dyn StreamFilter<HostStreamRef> {
        self.imp.as_mut()
    }
}

/// Owning handle for one per-route configuration.
///
/// The payload is shared (`Arc`) because live streams may still hold clones
/// obtained through the route-config capability when the host destroys the
/// handle itself.
pub struct RouteConfigHandle {
    imp: Arc<dyn Any + Send + Sync>,
}

impl RouteConfigHandle {
    pub fn new(imp: Arc<dyn Any + Send + Sync>) -> Box<Self> {
        Box::new(Self { imp })
    }

    /// Transfer ownership to the host as an opaque pointer.
    pub fn into_raw(self: Box<Self>) -> *mut c_void {
        Box::into_raw(self) as *mut c_void
    }

    /// Reclaim ownership from the host.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`RouteConfigHandle::into_raw`] and must not be
    /// used again afterwards.
    pub unsafe fn from_raw(ptr: *mut c_void) -> Box<Self> {
        // SAFETY: ptr originates from Box::into_raw on this type.
        unsafe { Box::from_raw(ptr as *mut Self) }
    }

    /// Borrow the handle behind a host-held pointer for one call.
    ///
    /// # Safety
    ///
    /// `ptr` must come from [`RouteConfigHandle::into_raw`] and not yet be
    /// destroyed.
    pub unsafe fn borrow_raw<'a>(ptr: *const c_void) -> &'a Self {
        // SAFETY: ptr is a live Box<Self> owned by the host's route table.
        unsafe { &*(ptr as *const Self) }
    }

    /// Clone out the shared payload.
    pub fn payload(&self) -> Arc<dyn Any + Send + Sync> {
        Arc::clone(&self.imp)
    }
}
