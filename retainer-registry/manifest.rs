use alloc::{string::String, vec::Vec};
use core::str::FromStr;

use hashbrown::HashSet;

use crate::{RetentionSet, is_c_symbol_name};

/// Problems found while reading an export manifest, or while comparing it
/// with an anchored retention set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("line {line}: `{name}` is not a valid C symbol name")]
    InvalidName { line: usize, name: String },
    #[error("`{0}` is listed more than once in the export manifest")]
    DuplicateEntry(String),
    /// The manifest lists an export that the anchor does not reference.
    #[error("`{0}` is listed in the export manifest, but the anchor does not retain it")]
    NotRetained(String),
    /// The anchor references a symbol that the manifest does not list.
    #[error("`{0}` is retained by the anchor, but missing from the export manifest")]
    Unlisted(String),
}

/// The list of native symbols a bridge exports, in the order they were
/// listed.
///
/// This is the source a retention set is generated from. The text form is the
/// one used by linker export lists: one symbol per line, with blank lines and
/// `#` comments ignored.
///
/// ```text
/// # Exports resolved by name at runtime.
/// foo
/// bar
/// baz     # trailing comments are fine too
/// ```
///
/// Mach-O export lists, which prefix every C symbol with an underscore, are
/// read with [`ExportManifest::parse_mach_o()`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportManifest {
    names: Vec<String>,
}

impl ExportManifest {
    #[must_use]
    pub const fn new() -> Self {
        Self { names: Vec::new() }
    }

    /// Parse the text form of a manifest. Names are taken verbatim.
    ///
    /// # Errors
    ///
    /// [`ManifestError::InvalidName`] for a line that is not a C symbol name,
    /// and [`ManifestError::DuplicateEntry`] for a name listed twice.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        Self::parse_with(text, false)
    }

    /// Parse an export list written with Mach-O symbol names, where every C
    /// symbol carries one extra leading underscore. The underscore is removed,
    /// so `_foo` is read as `foo` and `__foo` as `_foo`.
    ///
    /// ELF and PE export lists spell symbols without the prefix; read those
    /// with [`parse()`](Self::parse), which keeps `_foo` distinct from `foo`.
    ///
    /// # Errors
    ///
    /// As [`parse()`](Self::parse), and [`ManifestError::InvalidName`] for a
    /// line that does not start with an underscore.
    pub fn parse_mach_o(text: &str) -> Result<Self, ManifestError> {
        Self::parse_with(text, true)
    }

    fn parse_with(text: &str, mach_o: bool) -> Result<Self, ManifestError> {
        let mut manifest = Self::new();
        for (index, line) in text.lines().enumerate() {
            let line = line.split_once('#').map_or(line, |(before, _)| before).trim();
            if line.is_empty() {
                continue;
            }

            let name = if mach_o { line.strip_prefix('_') } else { Some(line) };
            match name {
                Some(name) if is_c_symbol_name(name) => manifest.push(name)?,
                _ => {
                    return Err(ManifestError::InvalidName {
                        line: index + 1,
                        name: line.into(),
                    });
                }
            }
        }
        Ok(manifest)
    }

    /// Append an export.
    ///
    /// # Errors
    ///
    /// [`ManifestError::InvalidName`] (with `line: 0`) if `name` is not a C
    /// symbol name, and [`ManifestError::DuplicateEntry`] if it is already
    /// listed.
    pub fn push(&mut self, name: &str) -> Result<(), ManifestError> {
        if !is_c_symbol_name(name) {
            return Err(ManifestError::InvalidName {
                line: 0,
                name: name.into(),
            });
        }
        if self.contains(name) {
            return Err(ManifestError::DuplicateEntry(name.into()));
        }
        self.names.push(name.into());
        Ok(())
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|listed| listed == name)
    }

    /// Listed names, in manifest order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    /// Check that `set` retains exactly the exports listed here.
    ///
    /// # Errors
    ///
    /// [`ManifestError::NotRetained`] for the first listed export (in manifest
    /// order) missing from `set`, or else [`ManifestError::Unlisted`] for the
    /// first entry of `set` that is not listed.
    pub fn check(&self, set: RetentionSet<'_>) -> Result<(), ManifestError> {
        let retained: HashSet<&str> = set.names().collect();
        if let Some(missing) = self.names().find(|name| !retained.contains(name)) {
            return Err(ManifestError::NotRetained(missing.into()));
        }

        let listed: HashSet<&str> = self.names().collect();
        match set.names().find(|name| !listed.contains(name)) {
            Some(unlisted) => Err(ManifestError::Unlisted(unlisted.into())),
            None => Ok(()),
        }
    }
}

impl FromStr for ExportManifest {
    type Err = ManifestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'a> IntoIterator for &'a ExportManifest {
    type Item = &'a str;
    type IntoIter = core::iter::Map<core::slice::Iter<'a, String>, fn(&'a String) -> &'a str>;

    fn into_iter(self) -> Self::IntoIter {
        self.names
            .iter()
            .map(String::as_str as fn(&'a String) -> &'a str)
    }
}

#[cfg(feature = "serde")]
const _: () = {
    impl serde::Serialize for ExportManifest {
        fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            self.names.serialize(serializer)
        }
    }

    impl<'de> serde::Deserialize<'de> for ExportManifest {
        fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
        where
            D: serde::Deserializer<'de>,
        {
            let names = Vec::<String>::deserialize(deserializer)?;
            let mut manifest = ExportManifest::new();
            for name in &names {
                manifest
                    .push(name)
                    .map_err(<D::Error as serde::de::Error>::custom)?;
            }
            Ok(manifest)
        }
    }
};
