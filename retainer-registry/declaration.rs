use core::fmt;

use hashbrown::HashSet;

/// An export recorded by `retainer::retain!(...)`.
///
/// A declaration only carries the symbol's name. It never holds the symbol's
/// address, so the declaration table can never keep a symbol alive on its
/// own: if nothing calls the anchor, declared exports are still stripped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C)]
pub struct Declaration {
    name: &'static str,
}

impl Declaration {
    #[inline(always)]
    #[must_use]
    #[doc(hidden)]
    pub const fn new(name: &'static str) -> Self {
        Self { name }
    }

    /// The linker symbol name of the declared export.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

/// View over a declaration table, as returned by the `declared_exports()`
/// function that `retainer::enable!()` generates.
///
/// The order of entries is whatever the linker chose.
#[derive(Clone, Copy)]
pub struct Declarations<'a> {
    declarations: &'a [Declaration],
}

impl<'a> Declarations<'a> {
    #[inline]
    #[must_use]
    pub const fn new(declarations: &'a [Declaration]) -> Self {
        Self { declarations }
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.declarations.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'a, Declaration> {
        self.declarations.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + use<'a> {
        self.declarations.iter().map(Declaration::name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names().any(|declared| declared == name)
    }

    /// Return the first symbol name that was declared more than once, if any.
    #[must_use]
    pub fn find_duplicate(&self) -> Option<&'static str> {
        let mut seen = HashSet::with_capacity(self.declarations.len());
        self.names().find(|name| !seen.insert(*name))
    }
}

impl<'a> IntoIterator for Declarations<'a> {
    type Item = &'a Declaration;
    type IntoIter = core::slice::Iter<'a, Declaration>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.declarations.iter()
    }
}

impl<'a> IntoIterator for &Declarations<'a> {
    type Item = &'a Declaration;
    type IntoIter = core::slice::Iter<'a, Declaration>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.declarations.iter()
    }
}

impl fmt::Debug for Declarations<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
