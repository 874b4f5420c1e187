use thiserror::Error;

/// Caller-supplied input rejected before any analysis work starts.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidInput {
    #[error("document has no non-empty passages")]
    EmptyDocument,

    #[error("no frameworks selected")]
    EmptySelection,
}
