//! Host collaborator surface.
//!
//! The host exposes a handful of capabilities back to module code. Only the
//! operations this SDK depends on are modeled here; header/body accessor
//! calls are a separate host surface consumed directly by filter
//! implementations and are not part of this core.

use std::any::Any;
use std::sync::Arc;

/// Per-stream capability handed to every filter callback.
///
/// One value of the implementing type corresponds to one host stream; the
/// host guarantees the same stream identity across all callbacks of a single
/// filter instance.
pub trait HostStream {
    /// Resume request-direction processing after a stop/pause status was
    /// returned from a request-side callback.
    fn continue_request(&mut self);

    /// Resume response-direction processing after a stop/pause status was
    /// returned from a response-side callback.
    fn continue_response(&mut self);

    /// The most specific per-route configuration installed for the stream's
    /// route, if the module registered one.
    fn route_config(&self) -> Option<Arc<dyn Any + Send + Sync>>;
}

/// Opaque identity of the host-side filter configuration object.
///
/// Configs may retain this token for the lifetime of the configuration; it
/// carries identity only and has no operations in this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConfigToken(usize);

impl ConfigToken {
    /// Wrap a host back-reference address.
    pub const fn from_addr(addr: usize) -> Self {
        Self(addr)
    }

    /// The wrapped address, for handing back across the boundary.
    pub const fn addr(self) -> usize {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_token_round_trips_its_address() {
        let token = ConfigToken::from_addr(0xDEAD_B000);
        assert_eq!(token.addr(), 0xDEAD_B000);
        assert_eq!(token, ConfigToken::from_addr(0xDEAD_B000));
    }
}
