//! Primitive wire encodings for the protocol codec.
//!
//! This crate provides [`Packer`] and [`Unpacker`] for the three primitive
//! encodings every protocol item is built from: variable-length integers,
//! fixed-width little-endian integers and NUL-terminated strings.
//!
//! # Design Principles
//!
//! - **No unsafe code**
//! - **Bounded operations** - All reads and writes are bounds-checked.
//! - **No domain knowledge** - This crate knows nothing about objects, events or messages.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use packer::{Packer, Sanitize, Unpacker};
//!
//! let mut packer = Packer::new();
//! packer.add_int(-65).unwrap();
//! packer.add_string("hello").unwrap();
//!
//! let bytes = packer.finish();
//!
//! let mut unpacker = Unpacker::new(&bytes);
//! assert_eq!(unpacker.get_int().unwrap(), -65);
//! assert_eq!(unpacker.get_string(Sanitize::None).unwrap(), "hello");
//! ```

mod error;
mod packer;
mod sanitize;
mod unpacker;

pub use error::{PackError, PackResult};
pub use packer::Packer;
pub use sanitize::Sanitize;
pub use unpacker::Unpacker;

/// Maximum encoded width of a variable-length integer.
pub const MAX_VARINT_BYTES: usize = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_roundtrip() {
        let packer = Packer::new();
        let bytes = packer.finish();
        assert!(bytes.is_empty());

        let unpacker = Unpacker::new(&bytes);
        assert!(unpacker.is_empty());
    }

    #[test]
    fn ints_roundtrip_various_widths() {
        let cases = [0, 1, 63, 64, -64, -65, 8191, 8192, -8193, i32::MAX, i32::MIN];

        for value in cases {
            let mut packer = Packer::new();
            packer.add_int(value).unwrap();
            let bytes = packer.finish();
            assert!(bytes.len() <= MAX_VARINT_BYTES);

            let mut unpacker = Unpacker::new(&bytes);
            assert_eq!(
                unpacker.get_int().unwrap(),
                value,
                "roundtrip failed for {value}"
            );
            assert!(unpacker.is_empty());
        }
    }

    #[test]
    fn mixed_roundtrip() {
        let mut packer = Packer::new();
        packer.add_int(3).unwrap();
        packer.add_uncompressed_int(-2).unwrap();
        packer.add_string("chat").unwrap();
        packer.add_raw(&[9, 8]).unwrap();
        let bytes = packer.finish();

        let mut unpacker = Unpacker::new(&bytes);
        assert_eq!(unpacker.get_int().unwrap(), 3);
        assert_eq!(unpacker.get_uncompressed_int().unwrap(), -2);
        assert_eq!(unpacker.get_string(Sanitize::None).unwrap(), "chat");
        assert_eq!(unpacker.get_raw(2).unwrap(), &[9, 8]);
        assert!(!unpacker.has_error());
    }
}
