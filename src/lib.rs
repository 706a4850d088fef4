//! `doubleconv` is a pure Rust, no-std implementation of
//! IEEE 754 double precision to decimal conversion.
//!
//! # Features
//!
//! - Shortest digits that read back as the input, using Grisu3
//!   ([`fast_dtoa`]) with an exact fallback ([`bignum_dtoa`]).
//! - A fixed number of significant digits.
//! - A fixed number of digits after the decimal point
//!   ([`fixed_dtoa`]).
//!
//! [`dtoa`] picks the right algorithm for each mode. The
//! individual algorithms are exposed for callers that want to
//! control the fallback themselves.
//!
//! The output is a sequence of decimal digits and the position
//! of the decimal point in a [`DtoaBuffer`]. Formatting the
//! digits as text is up to the caller.
//!
//! ```
//! use doubleconv::{dtoa, DtoaBuffer, DtoaMode};
//!
//! let mut buf = DtoaBuffer::new();
//! dtoa(1.5, DtoaMode::Shortest, 0, &mut buf).unwrap();
//! assert_eq!(buf.raw_digits(), "15");
//! assert_eq!(buf.decimal_point(), 1);
//! ```
//!
//! # Cargo Features
//!
//! - `std`: Include [`std`] support. Implements
//! [`std::error::Error`] for the error types.
//!
//! [`std`]: https://doc.rust-lang.org/std/

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(not(any(feature = "std", test)), deny(clippy::std_instead_of_core))]
#![cfg_attr(not(any(feature = "std", test)), no_std)]
#![deny(clippy::alloc_instead_of_core)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::cast_precision_loss)]
#![deny(clippy::expect_used)]
#![deny(clippy::implicit_saturating_sub)]
#![deny(clippy::indexing_slicing)]
#![deny(clippy::missing_panics_doc)]
#![deny(clippy::panic)]
#![deny(clippy::ptr_as_ptr)]
#![deny(clippy::string_slice)]
#![deny(clippy::transmute_ptr_to_ptr)]
#![deny(clippy::undocumented_unsafe_blocks)]
#![deny(clippy::unimplemented)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::wildcard_imports)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(unused_lifetimes)]
#![deny(unused_qualifications)]

pub mod bignum;
mod bignum_dtoa;
mod buffer;
mod cached_powers;
mod conv;
pub mod diyfp;
mod dtoatest;
mod fast_dtoa;
mod fixed_dtoa;
pub mod ieee;
mod util;

pub use bignum_dtoa::bignum_dtoa;
pub use buffer::DtoaBuffer;
pub use conv::*;
pub use fast_dtoa::{
    fast_dtoa, fast_dtoa_counted, fast_dtoa_shortest, FastDtoaMode, FAST_DTOA_MAXIMAL_LENGTH,
};
pub use fixed_dtoa::{fixed_dtoa, FIXED_DTOA_MAX_FRACTIONAL_DIGITS};

/// Simplifies importing common items.
pub mod prelude {
    pub use super::{dtoa, DtoaBuffer, DtoaMode};
}
