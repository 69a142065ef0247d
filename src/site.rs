//! Per-site algorithm state (§4.5): the document, vector time, role, and outstanding queue of
//! locally generated operations awaiting acknowledgment from the peer.

use crate::document::Document;
use crate::error::EngineError;
use crate::operation::Operation;
use crate::record::Record;
use crate::time::VectorTime;
use crate::transform::InclusionTransformation;
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Queue growth past this many unacknowledged entries is almost certainly a stuck peer, not
/// normal catch-up lag; logged as a warning, not treated as an error.
const OUTSTANDING_WARN_THRESHOLD: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Client,
    Server,
}

impl Role {
    /// The `client_flag` this role presents as the caller of `transform`.
    #[must_use]
    pub fn client_flag(self) -> bool {
        matches!(self, Self::Client)
    }
}

/// A locally generated, primitive operation still awaiting acknowledgment.
#[derive(Debug, Clone, PartialEq)]
struct OutstandingEntry {
    operation: Operation,
    stamp: u32,
}

#[derive(Debug)]
pub struct SiteState {
    document: Document,
    vector_time: VectorTime,
    site_id: u32,
    role: Role,
    outstanding: VecDeque<OutstandingEntry>,
}

impl SiteState {
    #[must_use]
    pub fn new(document: Document, site_id: u32, role: Role) -> Self {
        Self {
            document,
            vector_time: VectorTime::default(),
            site_id,
            role,
            outstanding: VecDeque::new(),
        }
    }

    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[must_use]
    pub fn vector_time(&self) -> VectorTime {
        self.vector_time
    }

    #[must_use]
    pub fn site_id(&self) -> u32 {
        self.site_id
    }

    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Applies a locally originated operation and returns the record to transport to the peer.
    pub fn local_op(&mut self, op: Operation) -> Result<Record, EngineError> {
        op.apply(&mut self.document)?;
        let record = Record::new(self.site_id, self.vector_time, op.clone());
        self.enqueue(op);
        self.vector_time.inc_local();
        debug!(site = self.site_id, time = %self.vector_time, "local_op applied");
        Ok(record)
    }

    /// Flattens a `Split` into its primitive children so the outstanding queue only ever holds
    /// operations the per-entry transform step in `remote_op` can reason about directly.
    fn enqueue(&mut self, op: Operation) {
        match op {
            Operation::Split(first, second) => {
                self.enqueue(*first);
                self.enqueue(*second);
            }
            other => {
                let stamp = self.vector_time.local;
                self.outstanding.push_back(OutstandingEntry {
                    operation: other,
                    stamp,
                });
                if self.outstanding.len() > OUTSTANDING_WARN_THRESHOLD {
                    warn!(
                        site = self.site_id,
                        len = self.outstanding.len(),
                        "outstanding queue is unusually large; peer may be stuck"
                    );
                }
            }
        }
    }

    /// Applies an incoming record from the peer, transforming it against every still-outstanding
    /// local operation (and updating those entries to reflect it in turn).
    pub fn remote_op(&mut self, record: Record) -> Result<(), EngineError> {
        self.check_preconditions(&record)?;
        self.discard_acknowledged(record.vector_time.remote);

        let client_flag = self.role.client_flag();
        let mut new_op = record.operation;
        for entry in &mut self.outstanding {
            let new_op_prime =
                InclusionTransformation::transform(&new_op, &entry.operation, client_flag);
            let entry_prime =
                InclusionTransformation::transform(&entry.operation, &new_op, !client_flag);
            debug!(site = self.site_id, "transformed against outstanding entry");
            new_op = new_op_prime;
            entry.operation = entry_prime;
        }

        new_op.apply(&mut self.document)?;
        self.vector_time.inc_remote();
        debug!(site = self.site_id, time = %self.vector_time, "remote_op applied");
        Ok(())
    }

    fn check_preconditions(&self, record: &Record) -> Result<(), EngineError> {
        if let Some(front) = self.outstanding.front() {
            if record.vector_time.remote < front.stamp {
                return Err(EngineError::ProtocolViolation(format!(
                    "record remote time {} precedes oldest outstanding stamp {}",
                    record.vector_time.remote, front.stamp
                )));
            }
        }
        if record.vector_time.remote > self.vector_time.local {
            return Err(EngineError::ProtocolViolation(format!(
                "record remote time {} exceeds local time {}",
                record.vector_time.remote, self.vector_time.local
            )));
        }
        if record.vector_time.local != self.vector_time.remote {
            return Err(EngineError::ProtocolViolation(format!(
                "record local time {} does not match expected remote time {}",
                record.vector_time.local, self.vector_time.remote
            )));
        }
        Ok(())
    }

    fn discard_acknowledged(&mut self, remote: u32) {
        while let Some(front) = self.outstanding.front() {
            if front.stamp < remote {
                self.outstanding.pop_front();
            } else {
                break;
            }
        }
    }
}
