//! Buffer and header descriptors and their borrowed views.
//!
//! The host describes byte ranges with flat `(pointer, length)` descriptors.
//! A view wraps a descriptor without copying or validating it: the produced
//! view is bit-identical to the descriptor it came from, and converting back
//! yields the original pointer and length. A null pointer with length zero
//! is a valid empty range, not an error, so the conversions are total.
//!
//! Views are only as valid as the call that supplied them. Module code that
//! wants bytes past the current callback must copy them into owned storage.

use std::marker::PhantomData;

// ---------------------------------------------------------------------------
// Raw descriptors
// ---------------------------------------------------------------------------

/// Read-only byte-range descriptor as it crosses the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawBytes {
    pub ptr: *const u8,
    pub len: usize,
}

impl RawBytes {
    /// The canonical empty range.
    pub const EMPTY: Self = Self {
        ptr: std::ptr::null(),
        len: 0,
    };

    /// Describe a module-owned slice. The slice must stay alive until the
    /// host has consumed the descriptor, which for return values means until
    /// the current call returns.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self {
            ptr: bytes.as_ptr(),
            len: bytes.len(),
        }
    }
}

/// Writable byte-range descriptor.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawBytesMut {
    pub ptr: *mut u8,
    pub len: usize,
}

impl RawBytesMut {
    /// Describe a module-owned mutable slice.
    pub fn from_slice(bytes: &mut [u8]) -> Self {
        Self {
            ptr: bytes.as_mut_ptr(),
            len: bytes.len(),
        }
    }
}

/// One key/value header pair as it crosses the boundary.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawHeader {
    pub key: RawBytes,
    pub value: RawBytes,
}

// ---------------------------------------------------------------------------
// Borrowed views
// ---------------------------------------------------------------------------

/// Read-only view of a host- or module-owned byte range.
///
/// Holds the descriptor bits unchanged; `as_slice` is the only place the
/// pointer is interpreted, and it maps the null/empty descriptor to `&[]`
/// without ever forming a reference from a null pointer.
#[derive(Debug, Clone, Copy)]
pub struct ByteView<'a> {
    raw: RawBytes,
    _borrow: PhantomData<&'a [u8]>,
}

impl<'a> ByteView<'a> {
    /// View a module-owned slice.
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            raw: RawBytes::from_slice(bytes),
            _borrow: PhantomData,
        }
    }

    /// Adopt a host-supplied descriptor.
    ///
    /// # Safety
    ///
    /// `raw` must describe memory readable for `raw.len` bytes that stays
    /// valid and unmodified for the lifetime `'a` the caller picks — for
    /// host descriptors, the duration of the current boundary call.
    pub unsafe fn from_raw(raw: RawBytes) -> Self {
        Self {
            raw,
            _borrow: PhantomData,
        }
    }

    /// The descriptor, bit-identical to what the view was built from.
    pub fn as_raw(&self) -> RawBytes {
        self.raw
    }

    /// The viewed bytes. Empty descriptors (including null/0) yield `&[]`.
    pub fn as_slice(&self) -> &'a [u8] {
        if self.raw.ptr.is_null() || self.raw.len == 0 {
            &[]
        } else {
            // SAFETY: non-null and non-empty, so the from_raw/new contract
            // guarantees readability for len bytes over 'a.
            unsafe { std::slice::from_raw_parts(self.raw.ptr, self.raw.len) }
        }
    }

    pub fn len(&self) -> usize {
        self.raw.len
    }

    pub fn is_empty(&self) -> bool {
        self.raw.len == 0
    }
}

/// Read-write view of a host-owned byte range.
#[derive(Debug)]
pub struct ByteViewMut<'a> {
    raw: RawBytesMut,
    _borrow: PhantomData<&'a mut [u8]>,
}

impl<'a> ByteViewMut<'a> {
    /// View a module-owned mutable slice.
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self {
            raw: RawBytesMut::from_slice(bytes),
            _borrow: PhantomData,
        }
    }

    /// Adopt a host-supplied writable descriptor.
    ///
    /// # Safety
    ///
    /// `raw` must describe memory readable and writable for `raw.len` bytes,
    /// valid and exclusively borrowed for `'a`.
    pub unsafe fn from_raw(raw: RawBytesMut) -> Self {
        Self {
            raw,
            _borrow: PhantomData,
        }
    }

    /// The descriptor, bit-identical to what the view was built from.
    pub fn as_raw(&self) -> RawBytesMut {
        self.raw
    }

    /// The viewed bytes, writable in place.
    pub fn as_slice_mut(&mut self) -> &mut [u8] {
        if self.raw.ptr.is_null() || self.raw.len == 0 {
            &mut []
        } else {
            // SAFETY: non-null and non-empty, so the from_raw/new contract
            // guarantees exclusive read-write access for len bytes.
            unsafe { std::slice::from_raw_parts_mut(self.raw.ptr, self.raw.len) }
        }
    }

    pub fn len(&self) -> usize {
        self.raw.len
    }

    pub fn is_empty(&self) -> bool {
        self.raw.len == 0
    }
}

/// Borrowed view of one header pair.
#[derive(Debug, Clone, Copy)]
pub struct HeaderView<'a> {
    key: ByteView<'a>,
    value: ByteView<'a>,
}

impl<'a> HeaderView<'a> {
    /// View a module-owned key/value pair, e.g. for emitting a new header.
    pub fn new(key: &'a [u8], value: &'a [u8]) -> Self {
        Self {
            key: ByteView::new(key),
            value: ByteView::new(value),
        }
    }

    /// Adopt a host-supplied header descriptor.
    ///
    /// # Safety
    ///
    /// Both ranges of `raw` must satisfy the [`ByteView::from_raw`] contract
    /// for `'a`.
    pub unsafe fn from_raw(raw: RawHeader) -> Self {
        // SAFETY: forwarded contract, per range.
        unsafe {
            Self {
                key: ByteView::from_raw(raw.key),
                value: ByteView::from_raw(raw.value),
            }
        }
    }

    /// The descriptor pair, bit-identical to the inputs.
    pub fn as_raw(&self) -> RawHeader {
        RawHeader {
            key: self.key.as_raw(),
            value: self.value.as_raw(),
        }
    }

    pub fn key(&self) -> &'a [u8] {
        self.key.as_slice()
    }

    pub fn value(&self) -> &'a [u8] {
        self.value.as_slice()
    }
}
