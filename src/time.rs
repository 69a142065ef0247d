//! Per-site vector time: a pair of monotone counters, nothing more.

use serde::{Deserialize, Serialize};

/// `(local, remote)` counters. `local` counts operations this site has emitted; `remote` counts
/// operations this site has received and applied from its peer.
///
/// The algorithm never needs to order two vector times against each other, only to compare them
/// for equality, so no `Ord` impl is provided (see DESIGN.md's Open Question notes).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VectorTime {
    pub local: u32,
    pub remote: u32,
}

impl VectorTime {
    #[must_use]
    pub const fn new(local: u32, remote: u32) -> Self {
        Self { local, remote }
    }

    /// Increments the local counter and returns its new value.
    pub fn inc_local(&mut self) -> u32 {
        self.local += 1;
        self.local
    }

    /// Increments the remote counter and returns its new value.
    pub fn inc_remote(&mut self) -> u32 {
        self.remote += 1;
        self.remote
    }
}

impl std::fmt::Display for VectorTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.local, self.remote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_start_at_zero() {
        let t = VectorTime::default();
        assert_eq!(t, VectorTime::new(0, 0));
    }

    #[test]
    fn increments_are_independent_and_monotone() {
        let mut t = VectorTime::new(0, 0);
        assert_eq!(t.inc_local(), 1);
        assert_eq!(t.inc_local(), 2);
        assert_eq!(t.remote, 0);
        assert_eq!(t.inc_remote(), 1);
        assert_eq!(t, VectorTime::new(2, 1));
    }

    #[test]
    fn display_matches_source_format() {
        assert_eq!(VectorTime::new(3, 7).to_string(), "3/7");
    }
}
