use core::fmt;

/// A native symbol that must survive dead-code elimination.
///
/// An `Export` pairs the symbol's name, as it appears in the linked binary's
/// symbol table, with the address of the symbol itself. Holding the address is
/// what creates a relocation against the symbol, which is the reference the
/// linker sees.
///
/// You should never need to construct this manually. Use the
/// `retainer::anchor!(...)` and `retainer::retain!(...)` macros.
#[derive(Clone, Copy)]
#[repr(C)]
pub struct Export {
    name: &'static str,
    address: *const (),
}

// SAFETY: `address` is only ever the address of a function or a static, which
// is immutable for the lifetime of the program. It is never dereferenced by
// this crate.
unsafe impl Sync for Export {}

// SAFETY: See `Sync` above.
unsafe impl Send for Export {}

impl Export {
    #[inline(always)]
    #[must_use]
    #[doc(hidden)]
    pub const fn new(name: &'static str, address: *const ()) -> Self {
        Self { name, address }
    }

    /// The linker symbol name of this export.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The address of the exported symbol.
    ///
    /// Turning this back into something callable is `unsafe`, and requires
    /// knowing the export's actual signature.
    #[inline]
    #[must_use]
    pub const fn address(&self) -> *const () {
        self.address
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Export")
            .field("name", &self.name)
            .field("address", &self.address)
            .finish()
    }
}

impl fmt::Display for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
