//! Build-script support for `retainer`.
//!
//! Generates the `retainer::anchor!(...)` invocation for a crate from its
//! export manifest, so that every symbol the bridge exports is retained
//! without maintaining a second list by hand.
//!
//! ```rust,ignore
//! // build.rs
//! fn main() -> Result<(), retainer_build::BuildError> {
//!     retainer_build::Builder::new("exports.txt").generate()?;
//!     Ok(())
//! }
//! ```
//!
//! ```rust,ignore
//! // lib.rs
//! include!(concat!(env!("OUT_DIR"), "/retain_native_symbols.rs"));
//! ```

use std::{
    borrow::Cow,
    fmt::Write as _,
    fs, io,
    path::{Path, PathBuf},
};

pub use retainer_registry::{ExportManifest, ManifestError};

/// Default name of the generated file inside `OUT_DIR`.
pub const DEFAULT_FILE_NAME: &str = "retain_native_symbols.rs";

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("failed to read export manifest {}", path.display())]
    ReadManifest { path: PathBuf, source: io::Error },
    #[error("failed to write {}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid export manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        source: ManifestError,
    },
    #[error("export manifest {} lists no exports", path.display())]
    EmptyManifest { path: PathBuf },
    /// The name is a valid C symbol, but cannot be spelled as a Rust item
    /// path (`self`, `crate`, `_`, ...).
    #[error("`{name}` cannot be referred to from Rust code")]
    UnsupportedName { name: String },
    #[error("`OUT_DIR` is not set; `generate()` must be called from a build script")]
    MissingOutDir,
}

/// Generates the anchor for a crate from its export manifest.
#[derive(Debug, Clone)]
pub struct Builder {
    manifest: PathBuf,
    file_name: String,
    crate_path: String,
    mach_o: bool,
}

impl Builder {
    /// A builder for the manifest at `manifest`, relative to the crate root
    /// when called from a build script.
    pub fn new(manifest: impl Into<PathBuf>) -> Self {
        Self {
            manifest: manifest.into(),
            file_name: DEFAULT_FILE_NAME.into(),
            crate_path: "::retainer".into(),
            mach_o: false,
        }
    }

    /// Name of the generated file. Defaults to [`DEFAULT_FILE_NAME`].
    #[must_use]
    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Path of the `retainer` crate, as seen from the crate including the
    /// generated file. Defaults to `::retainer`. Set this when `retainer` is
    /// renamed or re-exported.
    #[must_use]
    pub fn crate_path(mut self, crate_path: impl Into<String>) -> Self {
        self.crate_path = crate_path.into();
        self
    }

    /// Whether the manifest is a Mach-O export list, where every symbol is
    /// written with an extra leading underscore. Off by default: names are
    /// taken verbatim, as ELF and PE export lists spell them.
    ///
    /// See [`ExportManifest::parse_mach_o()`].
    #[must_use]
    pub fn mach_o_symbols(mut self, mach_o: bool) -> Self {
        self.mach_o = mach_o;
        self
    }

    /// Read and validate the manifest.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, does not parse, or lists nothing.
    pub fn read_manifest(&self) -> Result<ExportManifest, BuildError> {
        let text = fs::read_to_string(&self.manifest).map_err(|source| BuildError::ReadManifest {
            path: self.manifest.clone(),
            source,
        })?;
        let parsed = if self.mach_o {
            ExportManifest::parse_mach_o(&text)
        } else {
            ExportManifest::parse(&text)
        };
        let manifest = parsed.map_err(|source| BuildError::Manifest {
            path: self.manifest.clone(),
            source,
        })?;
        if manifest.is_empty() {
            return Err(BuildError::EmptyManifest {
                path: self.manifest.clone(),
            });
        }
        Ok(manifest)
    }

    /// Generate the anchor into `OUT_DIR`, and tell Cargo to rerun the build
    /// script when the manifest changes.
    ///
    /// Returns the path of the generated file.
    ///
    /// # Errors
    ///
    /// See [`generate_into()`](Self::generate_into). Also fails with
    /// [`BuildError::MissingOutDir`] outside of a build script.
    pub fn generate(&self) -> Result<PathBuf, BuildError> {
        let out_dir = std::env::var_os("OUT_DIR").ok_or(BuildError::MissingOutDir)?;
        println!("cargo::rerun-if-changed={}", self.manifest.display());
        self.generate_into(Path::new(&out_dir))
    }

    /// Generate the anchor into `out_dir`.
    ///
    /// The file is left untouched when its contents would not change, so
    /// that the including crate is not rebuilt needlessly.
    ///
    /// # Errors
    ///
    /// Fails if the manifest is invalid (see
    /// [`read_manifest()`](Self::read_manifest)), lists a name that Rust code
    /// cannot refer to, or if the output cannot be written.
    pub fn generate_into(&self, out_dir: &Path) -> Result<PathBuf, BuildError> {
        let manifest = self.read_manifest()?;
        let source = render(&manifest, &self.crate_path, &self.manifest)?;

        let path = out_dir.join(&self.file_name);
        if fs::read_to_string(&path).is_ok_and(|existing| existing == source) {
            return Ok(path);
        }
        fs::write(&path, source).map_err(|source| BuildError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

/// Render the `anchor!(...)` invocation for `manifest`.
///
/// `origin` is only used in the header comment of the generated code.
///
/// # Errors
///
/// [`BuildError::UnsupportedName`] for a listed name that cannot be written
/// as a Rust item path.
pub fn render(
    manifest: &ExportManifest,
    crate_path: &str,
    origin: &Path,
) -> Result<String, BuildError> {
    let mut out = String::new();
    // Writing to a `String` cannot fail.
    _ = writeln!(
        out,
        "// Generated by retainer-build from `{}`. Do not edit.",
        origin.display()
    );
    _ = writeln!(out, "{crate_path}::anchor!(");
    for name in manifest {
        match rust_ident(name) {
            Some(Cow::Borrowed(ident)) => {
                _ = writeln!(out, "    {ident},");
            }
            Some(Cow::Owned(raw)) => {
                _ = writeln!(out, "    {raw} => {name:?},");
            }
            None => {
                return Err(BuildError::UnsupportedName { name: name.into() });
            }
        }
    }
    out.push_str(");\n");
    Ok(out)
}

/// Rust spelling of the item exported as `name`, or `None` if there is none.
fn rust_ident(name: &str) -> Option<Cow<'_, str>> {
    const NOT_RAW: &[&str] = &["_", "crate", "self", "super", "Self"];
    const KEYWORDS: &[&str] = &[
        "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "do",
        "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if", "impl", "in",
        "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv", "pub", "ref",
        "return", "static", "struct", "trait", "true", "try", "type", "typeof", "unsafe",
        "unsized", "use", "virtual", "where", "while", "yield",
    ];

    if NOT_RAW.contains(&name) {
        None
    } else if KEYWORDS.contains(&name) {
        Some(Cow::Owned(format!("r#{name}")))
    } else {
        Some(Cow::Borrowed(name))
    }
}
