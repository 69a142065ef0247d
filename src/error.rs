//! The engine's closed error surface (§7 of the design).
//!
//! Everything below this boundary (operation application, site bookkeeping) fails with one of
//! these two kinds. Everything above it (the harness, the binary) works in `anyhow::Result` and
//! adds context as an `EngineError` crosses back out towards the user.

use thiserror::Error;

/// Either kind is fatal for the site that raised it: the engine offers no local recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// An operation could not be applied against the document it was handed: a position fell
    /// outside the document, or a delete's stored text no longer matched the document's content.
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),

    /// An incoming record's vector time contradicted the site's own vector time or its
    /// outstanding queue. Indicates an out-of-order delivery, a duplicated record, or upstream
    /// corruption; not a condition the engine can paper over.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
}
