//! ABI version identity.

use std::ffi::c_char;

/// Version byte string returned by the module-init entry point.
///
/// The host compares this against its own expected version with an exact
/// byte match and refuses to load the module on any difference. The
/// trailing NUL is part of the contract; the host reads a C string.
pub const ABI_VERSION: &[u8] = b"filtermod-abi:1\0";

/// The version string as the C pointer the init entry returns.
pub fn abi_version_ptr() -> *const c_char {
    ABI_VERSION.as_ptr() as *const c_char
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_nul_terminated_exactly_once() {
        assert_eq!(ABI_VERSION.last(), Some(&0u8));
        assert_eq!(
            ABI_VERSION.iter().filter(|b| **b == 0).count(),
            1,
            "interior NUL would truncate the host-side comparison"
        );
    }

    #[test]
    fn version_pointer_is_the_constant() {
        assert_eq!(abi_version_ptr() as *const u8, ABI_VERSION.as_ptr());
    }
}
