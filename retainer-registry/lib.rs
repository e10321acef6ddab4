//! Registry helper crate for `retainer`
//!
//! You probably don't need to use this crate directly. Use the
//! [`retainer`](../retainer) crate, or [`retainer-build`](../retainer_build)
//! from a build script.
//!
//! This crate holds the types shared by the macros in `retainer` and the
//! build-time tooling: the [`Export`] entries making up a retention set, the
//! [`RetentionSet`] view over them, the name-only [`Declaration`]s it is
//! checked against, and (with the `alloc` feature) the [`ExportManifest`] a
//! retention set is generated from.
//!
//! Everything here is `no_std`. The anchor function generated by
//! `retainer::anchor!()` only ever touches immutable statics, so it can run
//! on any thread, before any allocator or logger has been set up.

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(feature = "alloc")]
extern crate alloc;

mod declaration;
mod error;
mod export;
#[cfg(feature = "alloc")]
mod manifest;
mod retention_set;

pub use declaration::*;
pub use error::*;
pub use export::*;
#[cfg(feature = "alloc")]
pub use manifest::*;
pub use retention_set::*;

/// Whether `name` is usable as an unmangled C symbol name.
///
/// This is the C identifier grammar: an ASCII letter or underscore, followed
/// by ASCII letters, digits, or underscores.
#[must_use]
pub fn is_c_symbol_name(name: &str) -> bool {
    let mut bytes = name.bytes();
    match bytes.next() {
        Some(first) if first.is_ascii_alphabetic() || first == b'_' => {}
        _ => return false,
    }
    bytes.all(|b| b.is_ascii_alphanumeric() || b == b'_')
}
