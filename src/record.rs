//! The wire record exchanged between sites (§3, §6.1): an immutable
//! `(from_site_id, vector_time, operation)` triple.

use crate::operation::Operation;
use crate::time::VectorTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub from_site_id: u32,
    pub vector_time: VectorTime,
    pub operation: Operation,
}

impl Record {
    #[must_use]
    pub fn new(from_site_id: u32, vector_time: VectorTime, operation: Operation) -> Self {
        Self {
            from_site_id,
            vector_time,
            operation,
        }
    }

    /// Encodes this record as the compact tagged/varint shape described in §6.1.
    pub fn encode(&self) -> postcard::Result<Vec<u8>> {
        postcard::to_allocvec(self)
    }

    pub fn decode(bytes: &[u8]) -> postcard::Result<Self> {
        postcard::from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_through_postcard() {
        let record = Record::new(
            1,
            VectorTime::new(3, 1),
            Operation::insert(2, "hello"),
        );
        let bytes = record.encode().unwrap();
        assert_eq!(Record::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn round_trips_a_split_operation() {
        let record = Record::new(
            2,
            VectorTime::new(0, 4),
            Operation::delete(0, "abc"),
        );
        let bytes = record.encode().unwrap();
        assert_eq!(Record::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn decode_rejects_truncated_bytes() {
        let record = Record::new(1, VectorTime::new(0, 0), Operation::insert(0, "x"));
        let bytes = record.encode().unwrap();
        assert!(Record::decode(&bytes[..bytes.len() - 1]).is_err());
    }
}
