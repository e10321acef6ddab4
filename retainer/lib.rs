#![doc = include_str!("../README.md")]

pub use retainer_registry::{
    Declaration, Declarations, Export, RETAINED, RetentionError, RetentionSet,
};

#[cfg(feature = "alloc")]
pub use retainer_registry::{ExportManifest, ManifestError};

/// Define the retention anchor for the calling crate.
///
/// This expands to two items at the call site:
///
/// - `pub extern "C" fn retain_native_symbols() -> i32`, unmangled, which
///   references every listed symbol and always returns [`RETAINED`].
/// - `pub fn retention_set() -> RetentionSet<'static>`, the list of symbols
///   referenced by the anchor.
///
/// Each entry is either the identifier of an exported item, whose linker name
/// is the same as its Rust name (`#[unsafe(no_mangle)]`), or `item => "name"`
/// for items exported under a different name (`#[unsafe(export_name =
/// "...")]`).
///
/// ```rust,ignore
/// #[unsafe(no_mangle)]
/// pub extern "C" fn foo() -> i32 { 1 }
///
/// #[unsafe(export_name = "bridge_bar")]
/// pub extern "C" fn bar() -> i32 { 2 }
///
/// retainer::anchor!(foo, bar => "bridge_bar");
/// ```
///
/// Use this macro exactly once per linked binary. A second anchor fails to
/// link, because both define `retain_native_symbols`. The list is usually
/// generated from an export manifest by the `retainer-build` crate rather
/// than written by hand.
///
/// # Host contract
///
/// The host application must call `retain_native_symbols()` once during
/// startup, before any of the retained symbols are looked up by name. The
/// return value does not need to be inspected. If nothing calls the anchor,
/// the linker is free to drop it, and the retained symbols along with it.
///
/// # Low-level details
///
/// The listed addresses are stored in a `static` table local to the anchor,
/// so each of them becomes a relocation against the symbol itself. That is
/// what makes the linker keep the symbol (and pull its object file out of a
/// static archive), even though only the anchor refers to it. The anchor
/// reads every address through [`core::hint::black_box`], so the table cannot
/// be optimized away either.
#[macro_export]
macro_rules! anchor {
    (@name $item:ident => $name:literal) => {
        $name
    };
    (@name $item:ident) => {
        stringify!($item)
    };
    ($($item:ident $(=> $name:literal)?),* $(,)?) => {
        /// Keep every natively exported symbol of this crate in the final
        /// binary. Call once from the host's startup path.
        #[unsafe(no_mangle)]
        #[inline(never)]
        pub extern "C" fn retain_native_symbols() -> i32 {
            retention_set().retain()
        }

        /// The symbols referenced by `retain_native_symbols()`.
        #[must_use]
        pub fn retention_set() -> $crate::RetentionSet<'static> {
            static ANCHORED: &[$crate::Export] = &[
                $(
                    $crate::Export::new(
                        $crate::anchor!(@name $item $(=> $name)?),
                        $item as *const (),
                    ),
                )*
            ];
            $crate::RetentionSet::new(ANCHORED)
        }
    };
}

/// Declare exports of the calling crate.
///
/// Put this next to the definition of each natively exported item. It records
/// the item in the crate's declaration table, which can be compared with the
/// anchor using [`RetentionSet::verify_covers()`]. That check catches exports
/// that were added to the code but never listed in the anchor.
///
/// Declaring an export does **not** retain it. Only [`anchor!(...)`](anchor)
/// does that. A declaration records the symbol's name and nothing else; the
/// item itself is only named at compile time, to check that it exists.
///
/// **IMPORTANT:** For this macro to work in a particular crate, the
/// [`enable!()`](crate::enable) macro must appear exactly once in the crate's
/// root.
///
/// ```rust,ignore
/// #[unsafe(no_mangle)]
/// pub extern "C" fn foo() -> i32 { 1 }
/// retainer::retain!(foo);
/// ```
///
/// # Low-level details
///
/// Each declaration is an entry in a per-crate `linkme` "distributed slice".
/// Those entries are `#[used]`, so anything they pointed to would be kept by
/// the linker. They must therefore never hold the address of the declared
/// item: the anchor has to be the only thing keeping exports alive.
#[macro_export]
#[allow(clippy::crate_in_macro_def)]
macro_rules! retain {
    (@impl $item:expr, $name:expr) => {
        const _: () = {
            // Naming a function item does not take its address.
            let _ = $item;
        };
        const _: () = {
            // Note: Using `crate` to refer to the calling crate - this is deliberate.
            #[$crate::internal::linkme::distributed_slice(crate::_retainer_enabled::DECLARED)]
            #[linkme(crate = $crate::internal::linkme)]
            static DECLARATION: $crate::Declaration = $crate::Declaration::new($name);
        };
    };
    ($($item:ident),+ $(,)?) => {
        $(
            $crate::retain!(@impl $item, stringify!($item));
        )+
    };
    ($item:path => $name:literal) => {
        $crate::retain!(@impl $item, $name);
    };
}

/// Enable the [`retain!(...)`](retain) macro in the calling crate.
///
/// Put a call to this macro in the root of each crate that declares exports.
///
/// ## Details
///
/// This creates a "distributed slice" collecting every `retain!()` declaration
/// in this crate, and a `declared_exports()` function returning it as
/// [`Declarations`].
///
/// This macro may also be invoked with the name of another crate, or a path to
/// the module where that crate invoked `enable!()`, which
/// causes declarations in this crate to be collected in the other crate's
/// table instead. Use this when a bridge is split over several crates but
/// linked into one native library with a single anchor: enable the crate that
/// holds the anchor, and forward from all the others.
#[macro_export]
macro_rules! enable {
    () => {
        #[doc(hidden)]
        pub mod _retainer_enabled {
            #[$crate::internal::linkme::distributed_slice]
            #[linkme(crate = $crate::internal::linkme)]
            #[doc(hidden)]
            pub static DECLARED: [$crate::Declaration] = [..];
        }

        /// Exports declared with `retain!()` in this crate, and in crates
        /// forwarding their declarations to it.
        #[must_use]
        pub fn declared_exports() -> $crate::Declarations<'static> {
            $crate::Declarations::new(_retainer_enabled::DECLARED.static_slice())
        }
    };
    ($($seg:ident)::+) => {
        #[doc(hidden)]
        pub(crate) use $($seg)::+::_retainer_enabled;
    };
}

#[doc(hidden)]
pub mod internal {
    pub use linkme;
}
