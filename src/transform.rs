//! The inclusion transformation seam (§4.4).
//!
//! A thin dispatcher kept as its own type so the dispatch policy has one documented home,
//! separate from the case logic living in `Operation`.

use crate::operation::Operation;

pub struct InclusionTransformation;

impl InclusionTransformation {
    /// Returns `base` rewritten to incorporate the effect of `trans`.
    #[must_use]
    pub fn transform(base: &Operation, trans: &Operation, client_flag: bool) -> Operation {
        trans.transform(base, client_flag)
    }
}
