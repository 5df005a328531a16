//! # filtermod-core
//!
//! Safe capability layer for HTTP-filter modules loaded by a host proxy.
//!
//! This crate defines everything a filter module implements or consumes
//! without ever touching the raw boundary: the [`filter::FilterConfig`] and
//! [`filter::StreamFilter`] capability traits, the per-stage status
//! vocabularies, the leveled logging bridge, and the host collaborator
//! surface. No `unsafe` code is permitted at the crate level; all raw-pointer
//! work lives in `filtermod-abi`.
//!
//! # Architecture
//!
//! ```text
//! host process -> extern "C" entry (filtermod-abi) -> capability trait (this crate)
//!              -> module logic -> typed status -> entry -> raw ABI return
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod filter;
pub mod host;
pub mod log;
pub mod status;
