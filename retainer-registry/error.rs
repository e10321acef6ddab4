/// Disagreement between an anchored retention set and the exports that were
/// declared next to their definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RetentionError {
    /// An export was declared with `retain!()`, but the anchor does not
    /// reference it. It can be stripped from the final binary.
    #[error("`{0}` is declared as an export, but the anchor does not retain it")]
    NotRetained(&'static str),
    /// The same symbol name appears more than once in the anchored set.
    #[error("`{0}` appears more than once in the retention set")]
    Duplicate(&'static str),
    /// The same symbol name was declared with `retain!()` more than once.
    #[error("`{0}` is declared as an export more than once")]
    DeclaredTwice(&'static str),
}
