//! Per-stage callback status vocabularies.
//!
//! Each of the six per-stream callbacks returns a status drawn from its own
//! closed set. The discriminants are part of the module ABI and must not be
//! reordered; the host switches on the raw `u32` value.
//!
//! Every set contains `Continue`; the remaining variants stop or pause
//! iteration at that stage. Resumption after a stop is host-driven (see
//! [`crate::host::HostStream::continue_request`] and
//! [`crate::host::HostStream::continue_response`]).

// ---------------------------------------------------------------------------
// Header stages
// ---------------------------------------------------------------------------

/// Outcome of the request-headers callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RequestHeadersStatus {
    /// Hand the headers to the next stage of host processing.
    Continue = 0,
    /// Stop iteration; headers are held until the module resumes the stream.
    StopIteration = 1,
    /// Continue, but do not end the stream even if these headers carried
    /// end-of-stream.
    ContinueAndDontEndStream = 2,
    /// Stop all iteration and buffer subsequent data.
    StopAllIterationAndBuffer = 3,
    /// Stop all iteration and apply flow-control watermarks instead of
    /// unbounded buffering.
    StopAllIterationAndWatermark = 4,
}

impl RequestHeadersStatus {
    /// The complete status set for this stage.
    pub const ALL: &'static [Self] = &[
        Self::Continue,
        Self::StopIteration,
        Self::ContinueAndDontEndStream,
        Self::StopAllIterationAndBuffer,
        Self::StopAllIterationAndWatermark,
    ];
}

/// Outcome of the response-headers callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ResponseHeadersStatus {
    Continue = 0,
    StopIteration = 1,
    ContinueAndDontEndStream = 2,
    StopAllIterationAndBuffer = 3,
    StopAllIterationAndWatermark = 4,
}

impl ResponseHeadersStatus {
    /// The complete status set for this stage.
    pub const ALL: &'static [Self] = &[
        Self::Continue,
        Self::StopIteration,
        Self::ContinueAndDontEndStream,
        Self::StopAllIterationAndBuffer,
        Self::StopAllIterationAndWatermark,
    ];
}

// ---------------------------------------------------------------------------
// Body stages
// ---------------------------------------------------------------------------

/// Outcome of the request-body callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RequestBodyStatus {
    /// Hand the body chunk to the next stage of host processing.
    Continue = 0,
    /// Stop iteration and buffer the chunk.
    StopIterationAndBuffer = 1,
    /// Stop iteration and apply flow-control watermarks.
    StopIterationAndWatermark = 2,
    /// Stop iteration without buffering; the chunk is dropped from this
    /// stage's view.
    StopIterationNoBuffer = 3,
}

impl RequestBodyStatus {
    /// The complete status set for this stage.
    pub const ALL: &'static [Self] = &[
        Self::Continue,
        Self::StopIterationAndBuffer,
        Self::StopIterationAndWatermark,
        Self::StopIterationNoBuffer,
    ];
}

/// Outcome of the response-body callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ResponseBodyStatus {
    Continue = 0,
    StopIterationAndBuffer = 1,
    StopIterationAndWatermark = 2,
    StopIterationNoBuffer = 3,
}

impl ResponseBodyStatus {
    /// The complete status set for this stage.
    pub const ALL: &'static [Self] = &[
        Self::Continue,
        Self::StopIterationAndBuffer,
        Self::StopIterationAndWatermark,
        Self::StopIterationNoBuffer,
    ];
}

// ---------------------------------------------------------------------------
// Trailer stages
// ---------------------------------------------------------------------------

/// Outcome of the request-trailers callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum RequestTrailersStatus {
    Continue = 0,
    StopIteration = 1,
}

impl RequestTrailersStatus {
    /// The complete status set for this stage.
    pub const ALL: &'static [Self] = &[Self::Continue, Self::StopIteration];
}

/// Outcome of the response-trailers callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ResponseTrailersStatus {
    Continue = 0,
    StopIteration = 1,
}

impl ResponseTrailersStatus {
    /// The complete status set for this stage.
    pub const ALL: &'static [Self] = &[Self::Continue, Self::StopIteration];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_status_discriminants_are_stable() {
        assert_eq!(RequestHeadersStatus::Continue as u32, 0);
        assert_eq!(RequestHeadersStatus::StopIteration as u32, 1);
        assert_eq!(RequestHeadersStatus::ContinueAndDontEndStream as u32, 2);
        assert_eq!(RequestHeadersStatus::StopAllIterationAndBuffer as u32, 3);
        assert_eq!(RequestHeadersStatus::StopAllIterationAndWatermark as u32, 4);
        for (a, b) in RequestHeadersStatus::ALL
            .iter()
            .zip(ResponseHeadersStatus::ALL)
        {
            assert_eq!(*a as u32, *b as u32);
        }
    }

    #[test]
    fn body_status_discriminants_are_stable() {
        assert_eq!(RequestBodyStatus::Continue as u32, 0);
        assert_eq!(RequestBodyStatus::StopIterationAndBuffer as u32, 1);
        assert_eq!(RequestBodyStatus::StopIterationAndWatermark as u32, 2);
        assert_eq!(RequestBodyStatus::StopIterationNoBuffer as u32, 3);
        for (a, b) in RequestBodyStatus::ALL.iter().zip(ResponseBodyStatus::ALL) {
            assert_eq!(*a as u32, *b as u32);
        }
    }

    #[test]
    fn trailer_status_discriminants_are_stable() {
        assert_eq!(RequestTrailersStatus::Continue as u32, 0);
        assert_eq!(RequestTrailersStatus::StopIteration as u32, 1);
        assert_eq!(ResponseTrailersStatus::Continue as u32, 0);
        assert_eq!(ResponseTrailersStatus::StopIteration as u32, 1);
    }

    #[test]
    fn status_sets_are_closed() {
        assert_eq!(RequestHeadersStatus::ALL.len(), 5);
        assert_eq!(ResponseHeadersStatus::ALL.len(), 5);
        assert_eq!(RequestBodyStatus::ALL.len(), 4);
        assert_eq!(ResponseBodyStatus::ALL.len(), 4);
        assert_eq!(RequestTrailersStatus::ALL.len(), 2);
        assert_eq!(ResponseTrailersStatus::ALL.len(), 2);
    }
}
