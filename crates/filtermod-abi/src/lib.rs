//! # filtermod-abi
//!
//! `extern "C"` boundary layer between a host proxy and a filter module
//! built on `filtermod-core`.
//!
//! Modules link this crate, implement the core capability traits, and
//! invoke [`export_filter_module!`] once; the macro generates the fixed set
//! of `filtermod_on_*` entry points the host looks up at load time. Each
//! entry point is a thin one-to-one forwarding: opaque pointer in, typed
//! handle out, capability operation, raw return value.
//!
//! # Architecture
//!
//! ```text
//! host call -> filtermod_on_* entry -> typed handle/view -> capability trait
//!           -> module logic -> status/handle -> raw ABI return
//! ```
//!
//! This crate assumes the host upholds its side of the boundary contract:
//! handles it passes back were produced here, descriptors point at live
//! memory for the duration of the call, and every handle is destroyed
//! exactly once. Nothing here validates pointers beyond the null checks the
//! ABI itself defines.

pub mod buffer_abi;
pub mod entry_abi;
pub mod handle_abi;
pub mod host_abi;
pub mod version;

pub use buffer_abi::{ByteView, ByteViewMut, HeaderView, RawBytes, RawBytesMut, RawHeader};
pub use host_abi::{HostStreamRef, host_logger};
pub use version::ABI_VERSION;

// Re-exported so `export_filter_module!` expansions and module crates reach
// the capability layer through one dependency.
pub use filtermod_core::{config, filter, host, log, status};
