use core::{fmt, hint::black_box};

use hashbrown::HashSet;

use crate::{Declarations, Export, RetentionError};

/// The value returned by every call to the retention anchor.
///
/// It carries no information. The anchor returns something only so that its
/// body counts as having an observable effect.
pub const RETAINED: i32 = 0;

/// A fixed set of native symbols that must survive dead-code elimination.
///
/// This is a cheap, copyable view over a static table of [`Export`]s, such as
/// the one produced by `retainer::anchor!(...)`. The order of entries is not
/// meaningful.
#[derive(Clone, Copy)]
pub struct RetentionSet<'a> {
    exports: &'a [Export],
}

impl<'a> RetentionSet<'a> {
    #[inline]
    #[must_use]
    pub const fn new(exports: &'a [Export]) -> Self {
        Self { exports }
    }

    /// Number of entries.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.exports.len()
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.exports.is_empty()
    }

    #[inline]
    #[must_use]
    pub const fn as_slice(&self) -> &'a [Export] {
        self.exports
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'a, Export> {
        self.exports.iter()
    }

    /// Symbol names of all entries.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + use<'a> {
        self.exports.iter().map(Export::name)
    }

    /// Find the entry for the symbol called `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&'a Export> {
        self.exports.iter().find(|export| export.name() == name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Return the first symbol name that appears more than once, if any.
    #[must_use]
    pub fn find_duplicate(&self) -> Option<&'static str> {
        let mut seen = HashSet::with_capacity(self.exports.len());
        self.names().find(|name| !seen.insert(*name))
    }

    /// Check that every export in `declared` is also part of this set, and
    /// that neither side lists a name twice.
    ///
    /// `self` is the anchored set. `declared` is typically the table collected
    /// from `retain!()` declarations next to the export definitions.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError::Duplicate`] for the first duplicated name in
    /// `self`, then [`RetentionError::DeclaredTwice`] for the first name
    /// declared twice, or else [`RetentionError::NotRetained`] for the first
    /// declared export missing from `self`.
    pub fn verify_covers(&self, declared: Declarations<'_>) -> Result<(), RetentionError> {
        if let Some(name) = self.find_duplicate() {
            return Err(RetentionError::Duplicate(name));
        }
        if let Some(name) = declared.find_duplicate() {
            return Err(RetentionError::DeclaredTwice(name));
        }

        let anchored: HashSet<&str> = self.names().collect();
        match declared.names().find(|name| !anchored.contains(name)) {
            Some(missing) => Err(RetentionError::NotRetained(missing)),
            None => Ok(()),
        }
    }

    /// Touch every entry in a way the optimizer cannot see through, and return
    /// [`RETAINED`].
    ///
    /// This is the body of the retention anchor. It reads each address through
    /// [`black_box`], so the references to the symbols are kept alive, but it
    /// never calls or dereferences them. Calling it any number of times, from
    /// any thread, has no effect on program state.
    #[inline(never)]
    pub fn retain(&self) -> i32 {
        for export in black_box(self.exports) {
            black_box(export.address());
        }
        RETAINED
    }
}

impl<'a> IntoIterator for RetentionSet<'a> {
    type Item = &'a Export;
    type IntoIter = core::slice::Iter<'a, Export>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.exports.iter()
    }
}

impl<'a> IntoIterator for &RetentionSet<'a> {
    type Item = &'a Export;
    type IntoIter = core::slice::Iter<'a, Export>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.exports.iter()
    }
}

impl fmt::Debug for RetentionSet<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
