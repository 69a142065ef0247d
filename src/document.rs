//! A mutable, char-indexed text buffer.
//!
//! Every mutation is driven by an applied `Operation`; nothing else may touch the contents once
//! a `Document` is owned by a `SiteState`.

use crate::error::EngineError;
use ropey::Rope;

#[derive(Debug, Clone)]
pub struct Document {
    rope: Rope,
}

impl Document {
    #[must_use]
    pub fn new(initial: impl AsRef<str>) -> Self {
        Self {
            rope: Rope::from_str(initial.as_ref()),
        }
    }

    /// Number of characters currently in the document.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// The exact text in `[pos, pos + len)`, or a `PreconditionViolated` error if that range
    /// falls outside the document. Used by callers (notably the harness) that need to read
    /// back text before constructing a `Delete` operation's tombstone.
    pub fn slice(&self, pos: usize, len: usize) -> Result<String, EngineError> {
        let end = pos
            .checked_add(len)
            .filter(|&end| end <= self.len())
            .ok_or_else(|| {
                EngineError::PreconditionViolated(format!(
                    "range [{pos}, {pos}+{len}) exceeds document length {}",
                    self.len()
                ))
            })?;
        Ok(self.rope.slice(pos..end).to_string())
    }

    /// Inserts `text` at `pos`. Fails if `pos` is past the end of the document.
    pub fn insert(&mut self, pos: usize, text: &str) -> Result<(), EngineError> {
        if pos > self.len() {
            return Err(EngineError::PreconditionViolated(format!(
                "insert position {pos} exceeds document length {}",
                self.len()
            )));
        }
        self.rope.insert(pos, text);
        Ok(())
    }

    /// Erases `text` from `pos`. Fails if the range is out of bounds, or if the document's
    /// content at that range doesn't exactly match `text` (the tombstone has gone stale).
    pub fn erase(&mut self, pos: usize, text: &str) -> Result<(), EngineError> {
        let len = text.chars().count();
        let actual = self.slice(pos, len)?;
        if actual != text {
            return Err(EngineError::PreconditionViolated(format!(
                "delete at {pos} expected {text:?} but document has {actual:?}"
            )));
        }
        let end = pos + len;
        self.rope.remove(pos..end);
        Ok(())
    }
}

impl std::fmt::Display for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.rope == other.rope
    }
}
