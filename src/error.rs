use thiserror::Error;

/// Failure modes the typemap engine can report to its caller.
///
/// Most engine operations use absence (`None`) rather than an error to signal
/// "nothing found" -- see [`crate::matcher::search`] and [`crate::registry::Registry::copy`].
/// This enum only covers conditions that are genuinely exceptional.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypemapError {
    #[error(
        "typemap copy requires matching parameter counts, got {src_len} source parameter(s) \
         and {dest_len} destination parameter(s)"
    )]
    ArityMismatch { src_len: usize, dest_len: usize },

    #[error("typemap scope stack is already at its maximum depth ({max})")]
    ScopeOverflow { max: usize },

    #[error("cannot pop scope 0")]
    PopRootScope,
}

pub type Result<T> = std::result::Result<T, TypemapError>;
