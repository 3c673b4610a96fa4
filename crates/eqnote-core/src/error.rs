//! Error types for equation annotation.

use miette::Diagnostic;
use thiserror::Error;

use crate::anchor::AnchorId;
use crate::dom::DomError;

/// Errors that abort processing of a single annotation declaration.
///
/// None of these are fatal for the page: the binder logs them and moves on
/// to the next declaration.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum AnnotateError {
    /// An element the markup contract promises is absent.
    #[error("failed to find {what}: {id}")]
    #[diagnostic(code(eqnote::not_found))]
    NotFound { what: &'static str, id: String },

    /// The id exists but is not a tagged equation of the resolved block.
    #[error("missing target id: {id} in [{}]", .available.join(", "))]
    #[diagnostic(
        code(eqnote::missing_target),
        help("check the `data-annotation-target-ids` attribute against the equation labels")
    )]
    MissingTarget { id: AnchorId, available: Vec<String> },

    /// The id belongs to a different equation block than the first target.
    #[error("target id {id} is not in the same equation block as {first}")]
    #[diagnostic(
        code(eqnote::cross_block),
        help("a single annotation can only highlight lines of one equation block")
    )]
    CrossBlock { id: AnchorId, first: AnchorId },

    /// A declaration lists no target ids.
    #[error("annotation declaration has no target ids")]
    #[diagnostic(code(eqnote::no_targets))]
    NoTargets,

    /// The platform DOM rejected an operation.
    #[error("DOM error: {0}")]
    #[diagnostic(code(eqnote::dom))]
    Dom(#[from] DomError),
}

impl AnnotateError {
    pub(crate) fn not_found(what: &'static str, id: impl Into<String>) -> Self {
        AnnotateError::NotFound {
            what,
            id: id.into(),
        }
    }
}

pub type Result<T, E = AnnotateError> = std::result::Result<T, E>;
