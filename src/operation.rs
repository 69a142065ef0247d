//! The operation algebra: the four-variant operation type, `apply`, and the inclusion
//! transform rules (§4.1–§4.3 of the design).

use crate::document::Document;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};

/// An edit to a `Document`. Immutable once constructed; transforming an operation always
/// produces a fresh one rather than mutating the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Operation {
    /// The identity operation.
    NoOp,
    /// Insert `text` at character position `pos`.
    Insert { pos: usize, text: String },
    /// Erase `text` starting at character position `pos`. The text is stored so that later
    /// transforms can split or trim it without consulting the document.
    Delete { pos: usize, text: String },
    /// A composite produced by transformation: apply `second`, then `first`.
    Split(Box<Operation>, Box<Operation>),
}

impl Operation {
    #[must_use]
    pub fn insert(pos: usize, text: impl Into<String>) -> Self {
        Self::Insert {
            pos,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn delete(pos: usize, text: impl Into<String>) -> Self {
        Self::Delete {
            pos,
            text: text.into(),
        }
    }

    #[must_use]
    pub fn split(first: Self, second: Self) -> Self {
        Self::Split(Box::new(first), Box::new(second))
    }

    /// Applies this operation to `doc`. `Split(a, b)` applies `b` first, then `a`: splits are
    /// produced by transformation with `first` positioned to act on the document *after* `second`
    /// has already taken effect.
    pub fn apply(&self, doc: &mut Document) -> Result<(), EngineError> {
        match self {
            Self::NoOp => Ok(()),
            Self::Insert { pos, text } => doc.insert(*pos, text),
            Self::Delete { pos, text } => doc.erase(*pos, text),
            Self::Split(first, second) => {
                second.apply(doc)?;
                first.apply(doc)
            }
        }
    }

    /// Returns `base` rewritten to account for `self` having already been applied.
    ///
    /// Double dispatch: which of `transform_insert`/`transform_delete` gets called is decided by
    /// `self`'s variant; the case logic inside that method is decided by `base`'s variant.
    #[must_use]
    pub fn transform(&self, base: &Self, client: bool) -> Self {
        match self {
            Self::NoOp => base.clone(),
            Self::Insert { pos, text } => base.transform_insert(*pos, text, client),
            Self::Delete { pos, text } => base.transform_delete(*pos, text.chars().count(), client),
            Self::Split(first, second) => {
                let op1 = second.transform(base, client);
                first.transform(&op1, client)
            }
        }
    }

    /// Rewrites `self` (as the base operation) to include the effect of an insert of `text` at
    /// `pos`.
    fn transform_insert(&self, pos: usize, text: &str, client: bool) -> Self {
        match self {
            Self::NoOp => Self::NoOp,
            Self::Insert { pos: p, text: t } => {
                let p = *p;
                if p < pos {
                    Self::insert(p, t.clone())
                } else if p == pos {
                    if client {
                        Self::insert(p, t.clone())
                    } else {
                        Self::insert(p + char_len(t), t.clone())
                    }
                } else {
                    Self::insert(p + char_len(text), t.clone())
                }
            }
            Self::Delete { pos: p, text: t } => {
                let p = *p;
                let n = char_len(t);
                let m = char_len(text);
                if p + n < pos {
                    // disjoint: the insert lands entirely after the deleted range
                    Self::delete(p, t.clone())
                } else if pos <= p {
                    // insert at or before the deletion's start: the whole deletion shifts right
                    Self::delete(p + m, t.clone())
                } else {
                    // insert lands inside the deleted range: split the deletion around it,
                    // leaving the inserted text untouched in between.
                    Self::split(
                        Self::delete(p, char_slice(t, 0, pos - p)),
                        Self::delete(pos + m, char_slice(t, pos - p, n)),
                    )
                }
            }
            Self::Split(first, second) => Self::split(
                first.transform_insert(pos, text, client),
                second.transform_insert(pos, text, client),
            ),
        }
    }

    /// Rewrites `self` (as the base operation) to include the effect of a delete of `len`
    /// characters starting at `pos`.
    fn transform_delete(&self, pos: usize, len: usize, client: bool) -> Self {
        match self {
            Self::NoOp => Self::NoOp,
            Self::Insert { pos: p, text } => {
                let p = *p;
                if p <= pos {
                    Self::insert(p, text.clone())
                } else if p > pos + len {
                    Self::insert(p - len, text.clone())
                } else {
                    Self::insert(pos, text.clone())
                }
            }
            Self::Delete { pos: p, text: t } => {
                let p = *p;
                let n = char_len(t);
                if p + n < pos {
                    // disjoint, to the left
                    Self::delete(p, t.clone())
                } else if p >= pos + len {
                    // disjoint, to the right
                    Self::delete(p - len, t.clone())
                } else if pos <= p && pos + len >= p + n {
                    // entirely subsumed
                    Self::NoOp
                } else if pos <= p && pos + len < p + n {
                    // left side subsumed
                    Self::delete(pos, char_slice(t, pos + len - p, n))
                } else if pos > p && pos + len >= p + n {
                    // right side subsumed
                    Self::delete(p, char_slice(t, 0, pos - p))
                } else {
                    // middle subsumed: stitch the two remaining edges together
                    let mut remaining = char_slice(t, 0, pos - p);
                    remaining.push_str(&char_slice(t, pos + len - p, n));
                    Self::delete(p, remaining)
                }
            }
            Self::Split(first, second) => Self::split(
                first.transform_delete(pos, len, client),
                second.transform_delete(pos, len, client),
            ),
        }
    }
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// `s[start..end)` by character index (not byte index).
fn char_slice(s: &str, start: usize, end: usize) -> String {
    s.chars().skip(start).take(end - start).collect()
}
